pub mod app;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use state::AppState;
pub use storage::{load_store, persist_store, LocalStore};
pub use tracker::Tracker;
