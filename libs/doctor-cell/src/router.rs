use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::operator_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/schedules", get(handlers::list_all_schedules))
        .route("/{doctor_id}/schedules", get(handlers::list_doctor_schedules));

    let operator_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor))
        .route("/{doctor_id}/schedules", post(handlers::create_doctor_schedule))
        .route("/schedules/{schedule_id}", put(handlers::update_schedule))
        .route("/schedules/{schedule_id}", delete(handlers::delete_schedule))
        .layer(middleware::from_fn_with_state(state.clone(), operator_middleware));

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .with_state(state)
}

pub fn specialty_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/", get(handlers::list_specialties));

    let operator_routes = Router::new()
        .route("/", post(handlers::create_specialty))
        .layer(middleware::from_fn_with_state(state.clone(), operator_middleware));

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .with_state(state)
}
