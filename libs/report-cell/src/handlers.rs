use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{NextVisitsQuery, ReportError};
use crate::services::reports::ReportService;

fn map_report_error(err: ReportError) -> AppError {
    match err {
        ReportError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        ReportError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn get_home_summary(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&state);
    let summary = service.home_summary().await.map_err(map_report_error)?;

    Ok(Json(json!({ "summary": summary })))
}

pub async fn get_doctor_stats(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&state);
    let stats = service.doctor_stats().await.map_err(map_report_error)?;

    Ok(Json(json!({ "doctor_stats": stats })))
}

pub async fn get_next_visits(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<NextVisitsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&state);
    let visits = service
        .next_visits(query.doctor_id)
        .await
        .map_err(map_report_error)?;

    Ok(Json(json!({ "next_visits": visits })))
}
