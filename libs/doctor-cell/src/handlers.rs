use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    CreateDoctorRequest, CreateScheduleRequest, CreateSpecialtyRequest, DoctorError,
    UpdateDoctorRequest, UpdateScheduleRequest,
};
use crate::services::doctor::DoctorService;
use crate::services::schedule::ScheduleService;

fn map_doctor_error(err: DoctorError) -> AppError {
    match err {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::SpecialtyNotFound => AppError::NotFound("Specialty not found".to_string()),
        DoctorError::ScheduleNotFound => AppError::NotFound("Schedule not found".to_string()),
        DoctorError::DuplicateScheduleDay => {
            AppError::Conflict("Doctor already has a schedule for this day".to_string())
        }
        DoctorError::InvalidInterval => {
            AppError::BadRequest("Start time must be before end time".to_string())
        }
        DoctorError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctors = service.list_doctors().await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "doctors": doctors })))
}

pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.get_doctor(doctor_id).await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "doctor": doctor })))
}

pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.create_doctor(request).await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service
        .update_doctor(doctor_id, request)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

pub async fn list_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let specialties = service.list_specialties().await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "specialties": specialties })))
}

pub async fn create_specialty(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateSpecialtyRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let specialty = service
        .create_specialty(request)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "specialty": specialty })))
}

pub async fn list_all_schedules(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let schedules = service.list_all().await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "schedules": schedules })))
}

pub async fn list_doctor_schedules(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let schedules = service
        .list_for_doctor(doctor_id)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "schedules": schedules })))
}

pub async fn create_doctor_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let schedule = service
        .create_schedule(doctor_id, request)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "schedule": schedule })))
}

pub async fn update_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(schedule_id): Path<i64>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let schedule = service
        .update_schedule(schedule_id, request)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "schedule": schedule })))
}

pub async fn delete_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(schedule_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    service
        .delete_schedule(schedule_id)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true })))
}
