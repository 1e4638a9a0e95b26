use crate::models::{CheckboxValues, DayView, HourSlotView};
use chrono::{Duration, NaiveDate};

pub const DEFAULT_GOAL: &str = "Set goal";

const KEY_PREFIX: &str = "controlfreak_";
const KEY_SUFFIX: &str = "_calendar";

pub const TIMETABLE: [[&str; 6]; 4] = [
    ["0 am", "1 am", "2 am", "3 am", "4 am", "5 am"],
    ["6 am", "7 am", "8 am", "9 am", "10 am", "11 am"],
    ["12 pm", "13 pm", "14 pm", "15 pm", "16 pm", "17 pm"],
    ["18 pm", "19 pm", "20 pm", "21 pm", "22 pm", "23 pm"],
];

/// Storage key holding the checkbox data of `goal`.
pub fn goal_key(goal: &str) -> String {
    format!("{KEY_PREFIX}{}{KEY_SUFFIX}", sanitize(goal))
}

/// Recovers the sanitized goal from a key produced by [`goal_key`].
pub fn goal_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)?.strip_suffix(KEY_SUFFIX)
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

/// Offsets of every visible day, `0..=(today - start)`.
pub fn day_range(start: NaiveDate, today: NaiveDate) -> Vec<u32> {
    let diff = (today - start).num_days();
    if diff < 0 {
        return Vec::new();
    }
    (0..=diff as u32).collect()
}

pub fn field_name(date: NaiveDate, hour: &str) -> String {
    sanitize(&format!("{}_{hour}", date.format("%a %b %d %Y")))
}

pub fn day_title(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y, %a").to_string()
}

pub fn day_view(start: NaiveDate, offset: u32, values: &CheckboxValues) -> DayView {
    let date = start + Duration::days(i64::from(offset));
    let blocks: Vec<Vec<HourSlotView>> = TIMETABLE
        .iter()
        .map(|hours| {
            hours
                .iter()
                .map(|hour| {
                    let field = field_name(date, hour);
                    HourSlotView {
                        hour: (*hour).to_string(),
                        checked: values.get(&field).copied().unwrap_or(false),
                        field,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    DayView {
        offset,
        date: date.to_string(),
        title: day_title(date),
        blocks,
    }
}

/// Visible days, newest first.
pub fn timeline(start: NaiveDate, today: NaiveDate, values: &CheckboxValues) -> Vec<DayView> {
    day_range(start, today)
        .into_iter()
        .rev()
        .map(|offset| day_view(start, offset, values))
        .collect()
}

/// Whether `field` names an hour slot of a day between `start` and `today`.
pub fn is_visible_field(start: NaiveDate, today: NaiveDate, field: &str) -> bool {
    day_range(start, today).into_iter().any(|offset| {
        let date = start + Duration::days(i64::from(offset));
        TIMETABLE
            .iter()
            .flatten()
            .any(|hour| field_name(date, hour) == field)
    })
}
