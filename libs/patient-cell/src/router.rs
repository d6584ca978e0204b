use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::operator_middleware;

use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_patients))
        .route("/{patient_id}", get(handlers::get_patient));

    let operator_routes = Router::new()
        .route("/", post(handlers::create_patient))
        .route("/{patient_id}", put(handlers::update_patient))
        .layer(middleware::from_fn_with_state(state.clone(), operator_middleware));

    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .with_state(state)
}
