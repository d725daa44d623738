use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/stats", get(handlers::stats_page))
        .route("/api/today", get(handlers::get_today))
        .route("/api/save", post(handlers::save))
        .route("/api/check", post(handlers::check))
        .route("/api/history", get(handlers::get_history))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/import", post(handlers::import))
        .route("/api/export", get(handlers::export))
        .route("/api/clear", post(handlers::clear))
        .route("/api/undo", post(handlers::undo))
        .route("/api/fun", post(handlers::toggle_fun))
        .route("/api/ping", get(handlers::ping))
        .with_state(state)
}
