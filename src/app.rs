use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/upload/select", post(handlers::select_file))
        .route("/api/upload/drag", post(handlers::drag))
        .route("/api/upload", post(handlers::upload))
        .route("/api/stats/refresh", post(handlers::refresh_stats))
        .route("/api/reminders", post(handlers::send_reminders))
        .with_state(state)
}
