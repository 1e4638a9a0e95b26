use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/goal", post(handlers::goal_form))
        .route("/calendar", post(handlers::calendar_form))
        .route("/reset", post(handlers::reset_form))
        .route("/api/calendar", get(handlers::get_calendar).post(handlers::save_calendar))
        .route("/api/checkbox", post(handlers::set_checkbox))
        .route("/api/goal", post(handlers::update_goal))
        .route("/api/reset", post(handlers::reset))
        .route("/api/goals", get(handlers::get_goals))
        .with_state(state)
}
