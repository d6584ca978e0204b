use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::patient::PatientService;

fn map_patient_error(err: PatientError) -> AppError {
    match err {
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
        PatientError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patients = service.list_patients().await.map_err(map_patient_error)?;

    Ok(Json(json!({ "patients": patients })))
}

pub async fn get_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patient = service
        .get_patient(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "patient": patient })))
}

pub async fn create_patient(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patient = service
        .create_patient(request)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "success": true, "patient": patient })))
}

pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patient = service
        .update_patient(patient_id, request)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "success": true, "patient": patient })))
}
