use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::{AppError, ValidationErrors};

use crate::models::{
    BulkCancelRequest, CreateDiagnosisRequest, CreateRecipeRequest, CreateVisitRequest,
    UpdateVisitRequest, VisitError,
};
use crate::services::booking::VisitBookingService;
use crate::services::cancellation::BulkCancellationService;
use crate::services::records::RecordsService;

fn map_visit_error(err: VisitError) -> AppError {
    match err {
        VisitError::ValidationFailed(errors) => AppError::Validation(errors),
        VisitError::SlotAlreadyBooked => {
            // The store's uniqueness check failed; report it the same way
            // as the pre-write validation so the operator can resubmit.
            let mut errors = ValidationErrors::new();
            errors.add(
                "visit_time",
                "The doctor already has a visit at this date and time",
            );
            AppError::Validation(errors)
        }
        VisitError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        VisitError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        VisitError::VisitNotFound => AppError::NotFound("Visit not found".to_string()),
        VisitError::DiagnosisNotFound => AppError::NotFound("Diagnosis not found".to_string()),
        VisitError::RecipeNotFound => AppError::NotFound("Prescription not found".to_string()),
        VisitError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn list_visits(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = VisitBookingService::new(&state);
    let visits = service.list_visits().await.map_err(map_visit_error)?;

    Ok(Json(json!({ "visits": visits })))
}

pub async fn get_visit(
    State(state): State<Arc<AppConfig>>,
    Path(visit_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = VisitBookingService::new(&state);
    let visit = service.get_visit(visit_id).await.map_err(map_visit_error)?;

    Ok(Json(json!({ "visit": visit })))
}

pub async fn create_visit(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateVisitRequest>,
) -> Result<Json<Value>, AppError> {
    let service = VisitBookingService::new(&state);
    let visit = service.create_visit(request).await.map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true, "visit": visit })))
}

pub async fn update_visit(
    State(state): State<Arc<AppConfig>>,
    Path(visit_id): Path<i64>,
    Json(request): Json<UpdateVisitRequest>,
) -> Result<Json<Value>, AppError> {
    let service = VisitBookingService::new(&state);
    let visit = service
        .update_visit(visit_id, request)
        .await
        .map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true, "visit": visit })))
}

pub async fn delete_visit(
    State(state): State<Arc<AppConfig>>,
    Path(visit_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = VisitBookingService::new(&state);
    service.delete_visit(visit_id).await.map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true })))
}

pub async fn cancel_patient_visits(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BulkCancelRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BulkCancellationService::new(&state);
    let outcome = service
        .cancel_for_patient(request.patient_id)
        .await
        .map_err(map_visit_error)?;

    let message = if outcome.cancelled == 0 {
        "Patient has no scheduled visits to cancel".to_string()
    } else {
        format!("Cancelled {} scheduled visits", outcome.cancelled)
    };

    Ok(Json(json!({
        "success": true,
        "outcome": outcome,
        "message": message,
    })))
}

pub async fn list_diagnoses(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&state);
    let diagnoses = service.list_diagnoses().await.map_err(map_visit_error)?;

    Ok(Json(json!({ "diagnoses": diagnoses })))
}

pub async fn create_diagnosis(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateDiagnosisRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&state);
    let diagnosis = service
        .create_diagnosis(request)
        .await
        .map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true, "diagnosis": diagnosis })))
}

pub async fn list_visit_recipes(
    State(state): State<Arc<AppConfig>>,
    Path(visit_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&state);
    let recipes = service.list_recipes(visit_id).await.map_err(map_visit_error)?;

    Ok(Json(json!({ "recipes": recipes })))
}

pub async fn create_visit_recipe(
    State(state): State<Arc<AppConfig>>,
    Path(visit_id): Path<i64>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&state);
    let recipe = service
        .create_recipe(visit_id, request)
        .await
        .map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true, "recipe": recipe })))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppConfig>>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&state);
    service.delete_recipe(recipe_id).await.map_err(map_visit_error)?;

    Ok(Json(json!({ "success": true })))
}
