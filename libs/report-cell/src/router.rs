use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn report_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_home_summary))
        .route("/doctor-stats", get(handlers::get_doctor_stats))
        .route("/next-visits", get(handlers::get_next_visits))
        .with_state(state)
}
