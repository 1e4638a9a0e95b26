use crate::calendar::{self, DEFAULT_GOAL};
use crate::clock::Clock;
use crate::errors::AppError;
use crate::models::{CheckboxValues, DayView, StoredGoal};
use crate::storage::{format_start_date, parse_start_date, LocalStore, GOAL_KEY, START_DATE_KEY};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

/// Calendar state of the current goal. Mutations write through to the
/// store; persisting it to disk is left to the caller.
#[derive(Debug, Clone)]
pub struct Tracker {
    store: LocalStore,
    goal: String,
    start: NaiveDateTime,
    values: CheckboxValues,
}

impl Tracker {
    /// Reads goal, start date and checkbox values, filling in and persisting
    /// defaults for whatever is missing.
    pub fn load(mut store: LocalStore, clock: &dyn Clock) -> Self {
        let goal = match store.get_item(GOAL_KEY).filter(|goal| !goal.trim().is_empty()) {
            Some(goal) => goal.to_string(),
            None => {
                store.set_item(GOAL_KEY, DEFAULT_GOAL);
                DEFAULT_GOAL.to_string()
            }
        };

        let start = match store.get_item(START_DATE_KEY).and_then(parse_start_date) {
            Some(start) => start,
            None => {
                let now = clock.now();
                info!(start = %now, "initialising start date");
                store.set_item(START_DATE_KEY, format_start_date(now));
                now
            }
        };

        let values = read_values(&store, &calendar::goal_key(&goal));

        Self {
            store,
            goal,
            start,
            values,
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn goal_key(&self) -> String {
        calendar::goal_key(&self.goal)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn values(&self) -> &CheckboxValues {
        &self.values
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn days(&self, today: NaiveDate) -> Vec<u32> {
        calendar::day_range(self.start.date(), today)
    }

    pub fn timeline(&self, today: NaiveDate) -> Vec<DayView> {
        calendar::timeline(self.start.date(), today, &self.values)
    }

    pub fn is_visible_field(&self, today: NaiveDate, field: &str) -> bool {
        calendar::is_visible_field(self.start.date(), today, field)
    }

    /// Replaces the whole form and writes it under the current goal key.
    pub fn save_values(&mut self, values: CheckboxValues) -> Result<(), AppError> {
        self.values = values;
        let key = self.goal_key();
        write_values(&mut self.store, &key, &self.values)?;
        debug!(key = %key, entries = self.values.len(), "saved calendar values");
        Ok(())
    }

    pub fn set_checkbox(&mut self, field: &str, checked: bool) -> Result<(), AppError> {
        let mut values = self.values.clone();
        values.insert(field.to_string(), checked);
        self.save_values(values)
    }

    /// Renames the goal and moves the current form to the new key.
    ///
    /// Not transactional: if writing the new key fails, the goal has already
    /// been switched and the old key still holds the data.
    pub fn update_goal(&mut self, new_goal: &str) -> Result<(), AppError> {
        let old_key = self.goal_key();
        let new_key = calendar::goal_key(new_goal);
        if old_key != new_key && self.store.contains(&new_key) {
            warn!(key = %new_key, "overwriting stored calendar of another goal");
        }

        self.store.set_item(GOAL_KEY, new_goal);
        self.goal = new_goal.to_string();
        write_values(&mut self.store, &new_key, &self.values)?;
        if old_key != new_key {
            self.store.remove_item(&old_key);
        }

        info!(from = %old_key, to = %new_key, "moved calendar to new goal");
        Ok(())
    }

    /// Restarts the calendar today under the default goal with nothing
    /// checked. The previous goal's data stays under its own key.
    pub fn reset(&mut self, clock: &dyn Clock) -> Result<(), AppError> {
        let previous_key = self.goal_key();
        let now = clock.now();

        self.start = now;
        self.store.set_item(START_DATE_KEY, format_start_date(now));
        self.goal = DEFAULT_GOAL.to_string();
        self.store.set_item(GOAL_KEY, DEFAULT_GOAL);
        self.save_values(CheckboxValues::new())?;

        if previous_key == self.goal_key() {
            warn!(key = %previous_key, "reset cleared data of the default goal");
        }
        info!(start = %now, kept = %previous_key, "reset calendar");
        Ok(())
    }

    /// Every goal calendar present in the store.
    pub fn stored_goals(&self) -> Vec<StoredGoal> {
        let current = self.goal_key();
        self.store
            .keys()
            .filter_map(|key| {
                let goal = calendar::goal_from_key(key)?;
                let checked = read_values(&self.store, key)
                    .values()
                    .filter(|checked| **checked)
                    .count();
                Some(StoredGoal {
                    key: key.to_string(),
                    goal: goal.replace('_', " "),
                    checked,
                    current: key == current,
                })
            })
            .collect()
    }
}

fn read_values(store: &LocalStore, key: &str) -> CheckboxValues {
    store
        .get_item(key)
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

fn write_values(store: &mut LocalStore, key: &str, values: &CheckboxValues) -> Result<(), AppError> {
    let payload = serde_json::to_string(values)?;
    store.set_item(key, payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock(y: i32, m: u32, d: u32) -> FixedClock {
        FixedClock(date(y, m, d).and_hms_opt(9, 15, 0).unwrap())
    }

    fn checked(fields: &[&str]) -> CheckboxValues {
        fields.iter().map(|field| (field.to_string(), true)).collect()
    }

    #[test]
    fn load_initialises_and_persists_defaults() {
        let tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));

        assert_eq!(tracker.goal(), DEFAULT_GOAL);
        assert_eq!(tracker.start().date(), date(2023, 1, 1));
        assert!(tracker.values().is_empty());
        assert_eq!(tracker.store().get_item(GOAL_KEY), Some(DEFAULT_GOAL));
        assert_eq!(
            tracker.store().get_item(START_DATE_KEY),
            Some("2023-01-01T09:15:00")
        );
    }

    #[test]
    fn load_reads_existing_state() {
        let mut store = LocalStore::default();
        store.set_item(GOAL_KEY, "Run 5k");
        store.set_item(START_DATE_KEY, "2023-01-01T08:00:00");
        store.set_item("controlfreak_Run_5k_calendar", r#"{"Sun_Jan_01_2023_6_am":true}"#);

        let tracker = Tracker::load(store, &clock(2023, 1, 4));
        assert_eq!(tracker.goal(), "Run 5k");
        assert_eq!(tracker.days(date(2023, 1, 4)), vec![0, 1, 2, 3]);
        assert_eq!(tracker.values(), &checked(&["Sun_Jan_01_2023_6_am"]));
    }

    #[test]
    fn load_replaces_empty_goal_with_default() {
        let mut store = LocalStore::default();
        store.set_item(GOAL_KEY, "");
        store.set_item("controlfreak_Set_goal_calendar", r#"{"Sun_Jan_01_2023_2_am":true}"#);

        let tracker = Tracker::load(store, &clock(2023, 1, 1));
        assert_eq!(tracker.goal(), DEFAULT_GOAL);
        assert_eq!(tracker.store().get_item(GOAL_KEY), Some(DEFAULT_GOAL));
        assert_eq!(tracker.values(), &checked(&["Sun_Jan_01_2023_2_am"]));
    }

    #[test]
    fn load_treats_corrupt_values_as_empty() {
        let mut store = LocalStore::default();
        store.set_item(GOAL_KEY, DEFAULT_GOAL);
        store.set_item("controlfreak_Set_goal_calendar", "not json");

        let tracker = Tracker::load(store, &clock(2023, 1, 1));
        assert!(tracker.values().is_empty());
    }

    #[test]
    fn load_replaces_unparseable_start_date() {
        let mut store = LocalStore::default();
        store.set_item(START_DATE_KEY, "someday");

        let tracker = Tracker::load(store, &clock(2023, 3, 2));
        assert_eq!(tracker.start().date(), date(2023, 3, 2));
        assert_eq!(
            tracker.store().get_item(START_DATE_KEY),
            Some("2023-03-02T09:15:00")
        );
    }

    #[test]
    fn days_grow_with_today() {
        let tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        assert_eq!(tracker.days(date(2023, 1, 1)).len(), 1);
        assert_eq!(tracker.days(date(2023, 1, 31)).len(), 31);
    }

    #[test]
    fn update_goal_moves_data_and_removes_old_key() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        tracker.save_values(checked(&["Sun_Jan_01_2023_0_am"])).unwrap();

        tracker.update_goal("Run 5k").unwrap();

        let store = tracker.store();
        assert_eq!(store.get_item(GOAL_KEY), Some("Run 5k"));
        assert!(!store.contains("controlfreak_Set_goal_calendar"));
        assert_eq!(
            store.get_item("controlfreak_Run_5k_calendar"),
            Some(r#"{"Sun_Jan_01_2023_0_am":true}"#)
        );
        assert_eq!(tracker.goal_key(), "controlfreak_Run_5k_calendar");
    }

    #[test]
    fn rename_round_trip_restores_data() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        let values = checked(&["Sun_Jan_01_2023_0_am", "Sun_Jan_01_2023_13_pm"]);
        tracker.save_values(values.clone()).unwrap();
        let before = tracker.store().clone();

        tracker.update_goal("Meditate").unwrap();
        tracker.update_goal(DEFAULT_GOAL).unwrap();

        assert_eq!(tracker.store(), &before);
        assert_eq!(tracker.values(), &values);
    }

    #[test]
    fn renaming_to_same_key_keeps_data() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        tracker.save_values(checked(&["Sun_Jan_01_2023_0_am"])).unwrap();

        tracker.update_goal("Set_goal").unwrap();

        assert_eq!(
            tracker.store().get_item("controlfreak_Set_goal_calendar"),
            Some(r#"{"Sun_Jan_01_2023_0_am":true}"#)
        );
    }

    #[test]
    fn renaming_onto_stored_goal_replaces_its_data() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        tracker.update_goal("Run 5k").unwrap();
        tracker.set_checkbox("Sun_Jan_01_2023_0_am", true).unwrap();
        tracker.reset(&clock(2023, 1, 1)).unwrap();
        tracker.set_checkbox("Sun_Jan_01_2023_5_am", true).unwrap();

        tracker.update_goal("Run 5k").unwrap();

        assert_eq!(tracker.values(), &checked(&["Sun_Jan_01_2023_5_am"]));
        assert_eq!(
            tracker.store().get_item("controlfreak_Run_5k_calendar"),
            Some(r#"{"Sun_Jan_01_2023_5_am":true}"#)
        );
        assert!(!tracker.store().contains("controlfreak_Set_goal_calendar"));
    }

    #[test]
    fn reset_clears_form_and_keeps_previous_goal_data() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        tracker.update_goal("Run 5k").unwrap();
        tracker.set_checkbox("Sun_Jan_01_2023_0_am", true).unwrap();

        tracker.reset(&clock(2023, 2, 10)).unwrap();

        assert_eq!(tracker.goal(), DEFAULT_GOAL);
        assert!(tracker.values().is_empty());
        assert_eq!(tracker.start().date(), date(2023, 2, 10));
        assert_eq!(tracker.days(date(2023, 2, 10)), vec![0]);
        assert_eq!(
            tracker.store().get_item("controlfreak_Run_5k_calendar"),
            Some(r#"{"Sun_Jan_01_2023_0_am":true}"#)
        );
        assert_eq!(tracker.store().get_item("controlfreak_Set_goal_calendar"), Some("{}"));
        assert_eq!(
            tracker.store().get_item(START_DATE_KEY),
            Some("2023-02-10T09:15:00")
        );
    }

    #[test]
    fn stored_goals_lists_calendars() {
        let mut tracker = Tracker::load(LocalStore::default(), &clock(2023, 1, 1));
        tracker.update_goal("Run 5k").unwrap();
        tracker
            .save_values(checked(&["Sun_Jan_01_2023_0_am", "Sun_Jan_01_2023_1_am"]))
            .unwrap();
        tracker.reset(&clock(2023, 1, 2)).unwrap();

        let goals = tracker.stored_goals();
        assert_eq!(
            goals,
            vec![
                StoredGoal {
                    key: "controlfreak_Run_5k_calendar".into(),
                    goal: "Run 5k".into(),
                    checked: 2,
                    current: false,
                },
                StoredGoal {
                    key: "controlfreak_Set_goal_calendar".into(),
                    goal: "Set goal".into(),
                    checked: 0,
                    current: true,
                },
            ]
        );
    }
}
