use crate::errors::AppError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub const GOAL_KEY: &str = "controlfreak_goal";
pub const START_DATE_KEY: &str = "controlfreak_start_date";

const START_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const LEGACY_START_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Flat string-to-string store, persisted as a single JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct LocalStore {
    items: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

pub async fn load_store(path: &Path) -> LocalStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse store file: {err}");
                LocalStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStore::default(),
        Err(err) => {
            error!("failed to read store file: {err}");
            LocalStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &LocalStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store)?;
    fs::write(path, payload).await?;
    Ok(())
}

pub fn format_start_date(value: NaiveDateTime) -> String {
    value.format(START_DATE_FORMAT).to_string()
}

/// Accepts the native format, a bare date, or a browser `Date::toString` value.
pub fn parse_start_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, START_DATE_FORMAT) {
        return Some(value);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    // "Sun Jan 01 2023 10:00:00 GMT+0100 (Central European Standard Time)"
    let legacy = raw.get(..24)?;
    NaiveDateTime::parse_from_str(legacy, LEGACY_START_DATE_FORMAT).ok()
}
