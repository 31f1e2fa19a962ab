pub mod app;
pub mod backup;
pub mod config;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod widget;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use stats::{completion_rate, current_streak, is_completed_on, longest_streak};
pub use storage::load_data;
