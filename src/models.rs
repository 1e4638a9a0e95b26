use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checkbox field name to checked flag, as stored under a goal key.
pub type CheckboxValues = BTreeMap<String, bool>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourSlotView {
    pub hour: String,
    pub field: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayView {
    pub offset: u32,
    pub date: String,
    pub title: String,
    pub blocks: Vec<Vec<HourSlotView>>,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarUpdate {
    #[serde(default)]
    pub values: CheckboxValues,
}

#[derive(Debug, Deserialize)]
pub struct CheckboxRequest {
    pub field: String,
    pub checked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub goal: String,
    pub goal_key: String,
    pub start_date: String,
    pub today: String,
    pub days: usize,
    pub timeline: Vec<DayView>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredGoal {
    pub key: String,
    pub goal: String,
    pub checked: usize,
    pub current: bool,
}
