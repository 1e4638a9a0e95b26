use crate::clock::Clock;
use crate::tracker::Tracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub clock: Arc<dyn Clock>,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, clock: Arc<dyn Clock>, tracker: Tracker) -> Self {
        Self {
            data_path,
            clock,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
