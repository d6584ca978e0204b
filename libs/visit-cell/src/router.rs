use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::operator_middleware;

use crate::handlers;

pub fn visit_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_visits))
        .route("/{visit_id}", get(handlers::get_visit))
        .route("/{visit_id}/recipes", get(handlers::list_visit_recipes));

    let operator_routes = Router::new()
        .route("/", post(handlers::create_visit))
        .route("/{visit_id}", put(handlers::update_visit))
        .route("/{visit_id}", delete(handlers::delete_visit))
        .route("/cancel-by-patient", post(handlers::cancel_patient_visits))
        .route("/{visit_id}/recipes", post(handlers::create_visit_recipe))
        .route("/recipes/{recipe_id}", delete(handlers::delete_recipe))
        .layer(middleware::from_fn_with_state(state.clone(), operator_middleware));

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .with_state(state)
}

pub fn diagnosis_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/", get(handlers::list_diagnoses));

    let operator_routes = Router::new()
        .route("/", post(handlers::create_diagnosis))
        .layer(middleware::from_fn_with_state(state.clone(), operator_middleware));

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .with_state(state)
}
