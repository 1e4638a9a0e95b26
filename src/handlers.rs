use crate::errors::AppError;
use crate::models::{
    CalendarResponse, CalendarUpdate, CheckboxRequest, CheckboxValues, GoalRequest, StoredGoal,
};
use crate::state::AppState;
use crate::storage::{format_start_date, persist_store};
use crate::tracker::Tracker;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use std::collections::HashMap;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.clock.today();
    let tracker = state.tracker.lock().await;
    Html(render_index(tracker.goal(), &tracker.timeline(today)))
}

pub async fn get_calendar(State(state): State<AppState>) -> Json<CalendarResponse> {
    let tracker = state.tracker.lock().await;
    Json(to_response(&state, &tracker))
}

pub async fn get_goals(State(state): State<AppState>) -> Json<Vec<StoredGoal>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.stored_goals())
}

pub async fn save_calendar(
    State(state): State<AppState>,
    Json(payload): Json<CalendarUpdate>,
) -> Result<Json<CalendarResponse>, AppError> {
    let response = mutate(&state, |tracker| tracker.save_values(payload.values)).await?;
    Ok(Json(response))
}

pub async fn set_checkbox(
    State(state): State<AppState>,
    Json(payload): Json<CheckboxRequest>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = state.clock.today();
    let response = mutate(&state, |tracker| {
        if !tracker.is_visible_field(today, &payload.field) {
            return Err(AppError::bad_request(format!(
                "unknown checkbox '{}'",
                payload.field
            )));
        }
        tracker.set_checkbox(&payload.field, payload.checked)
    })
    .await?;
    Ok(Json(response))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<CalendarResponse>, AppError> {
    let response = apply_goal(&state, &payload.goal).await?;
    Ok(Json(response))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<CalendarResponse>, AppError> {
    let response = apply_reset(&state).await?;
    Ok(Json(response))
}

pub async fn goal_form(
    State(state): State<AppState>,
    Form(payload): Form<GoalRequest>,
) -> Result<Redirect, AppError> {
    apply_goal(&state, &payload.goal).await?;
    Ok(Redirect::to("/"))
}

/// Browsers only submit checked boxes, so every submitted field is `true`.
pub async fn calendar_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect, AppError> {
    let values: CheckboxValues = fields.into_keys().map(|field| (field, true)).collect();
    mutate(&state, |tracker| tracker.save_values(values)).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_reset(&state).await?;
    Ok(Redirect::to("/"))
}

async fn apply_goal(state: &AppState, goal: &str) -> Result<CalendarResponse, AppError> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(AppError::bad_request("goal must not be empty"));
    }
    mutate(state, |tracker| tracker.update_goal(goal)).await
}

async fn apply_reset(state: &AppState) -> Result<CalendarResponse, AppError> {
    let clock = state.clock.clone();
    mutate(state, |tracker| tracker.reset(clock.as_ref())).await
}

/// Applies `change` under the lock and persists the store before answering.
async fn mutate<F>(state: &AppState, change: F) -> Result<CalendarResponse, AppError>
where
    F: FnOnce(&mut Tracker) -> Result<(), AppError>,
{
    let mut tracker = state.tracker.lock().await;
    change(&mut *tracker)?;
    persist_store(&state.data_path, tracker.store()).await?;
    Ok(to_response(state, &tracker))
}

fn to_response(state: &AppState, tracker: &Tracker) -> CalendarResponse {
    let today = state.clock.today();
    let timeline = tracker.timeline(today);
    CalendarResponse {
        goal: tracker.goal().to_string(),
        goal_key: tracker.goal_key(),
        start_date: format_start_date(tracker.start()),
        today: today.to_string(),
        days: timeline.len(),
        timeline,
    }
}
