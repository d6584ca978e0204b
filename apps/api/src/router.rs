use std::sync::Arc;

use axum::{routing::get, Router};

use doctor_cell::router::{doctor_routes, specialty_routes};
use patient_cell::router::patient_routes;
use report_cell::router::report_routes;
use session_cell::router::session_routes;
use shared_config::AppConfig;
use visit_cell::router::{diagnosis_routes, visit_routes};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Polyclinic API is running!" }))
        .nest("/session", session_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/specialties", specialty_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/visits", visit_routes(state.clone()))
        .nest("/diagnoses", diagnosis_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
}
