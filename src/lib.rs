pub mod app;
pub mod chart;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod refresh;
pub mod reminders;
pub mod state;
pub mod stats;
pub mod ui;
pub mod upload;

pub use app::router;
pub use config::Config;
pub use dashboard::Dashboard;
pub use state::AppState;
