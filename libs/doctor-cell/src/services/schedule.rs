use std::collections::HashMap;

use chrono::NaiveTime;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::{return_representation, StoreError};
use shared_database::routing::{EntityGroup, StoreRouter};
use shared_models::week::WeekDay;

use crate::models::{
    CreateScheduleRequest, Doctor, DoctorError, DoctorSchedule, ScheduleListRow,
    Specialty, UpdateScheduleRequest,
};

pub struct ScheduleService {
    store: StoreRouter,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    /// Schedule listing across all doctors, ordered by doctor name.
    pub async fn list_all(&self) -> Result<Vec<ScheduleListRow>, DoctorError> {
        debug!("Listing schedules for all doctors");

        let schedules: Vec<DoctorSchedule> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, "/rest/v1/doctor_schedules?order=id.asc", None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let doctors: Vec<Doctor> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, "/rest/v1/doctors", None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let specialties: Vec<Specialty> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, "/rest/v1/specialties", None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let specialty_names: HashMap<i64, String> =
            specialties.into_iter().map(|s| (s.id, s.name)).collect();
        let doctor_index: HashMap<i64, &Doctor> =
            doctors.iter().map(|d| (d.id, d)).collect();

        let mut rows: Vec<ScheduleListRow> = schedules
            .into_iter()
            .filter_map(|s| {
                let doctor = doctor_index.get(&s.doctor_id)?;
                Some(ScheduleListRow {
                    doctor: doctor.full_name(),
                    specialty: specialty_names
                        .get(&doctor.specialty_id)
                        .cloned()
                        .unwrap_or_else(|| "-".to_string()),
                    day: s.day,
                    start_time: s.start_time,
                    end_time: s.end_time,
                })
            })
            .collect();

        rows.sort_by(|a, b| a.doctor.cmp(&b.doctor));

        Ok(rows)
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<DoctorSchedule>, DoctorError> {
        debug!("Listing schedules for doctor {}", doctor_id);

        let path = format!(
            "/rest/v1/doctor_schedules?doctor_id=eq.{}&order=id.asc",
            doctor_id
        );
        let result: Vec<DoctorSchedule> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn create_schedule(
        &self,
        doctor_id: i64,
        request: CreateScheduleRequest,
    ) -> Result<DoctorSchedule, DoctorError> {
        debug!(
            "Creating schedule for doctor {} on {}",
            doctor_id, request.day
        );

        if request.start_time >= request.end_time {
            return Err(DoctorError::InvalidInterval);
        }

        self.require_doctor(doctor_id).await?;

        let schedule_data = json!({
            "doctor_id": doctor_id,
            "day": request.day,
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "end_time": request.end_time.format("%H:%M:%S").to_string(),
        });

        let result: Vec<DoctorSchedule> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/doctor_schedules",
                Some(schedule_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => DoctorError::DuplicateScheduleDay,
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::DatabaseError("insert returned no row".to_string()))
    }

    pub async fn update_schedule(
        &self,
        schedule_id: i64,
        request: UpdateScheduleRequest,
    ) -> Result<DoctorSchedule, DoctorError> {
        debug!("Updating schedule {}", schedule_id);

        let current = self.get_schedule(schedule_id).await?;

        let start = request.start_time.unwrap_or(current.start_time);
        let end = request.end_time.unwrap_or(current.end_time);
        if start >= end {
            return Err(DoctorError::InvalidInterval);
        }

        let mut update_data = serde_json::Map::new();
        if let Some(start_time) = request.start_time {
            update_data.insert(
                "start_time".to_string(),
                json!(start_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(end_time) = request.end_time {
            update_data.insert(
                "end_time".to_string(),
                json!(end_time.format("%H:%M:%S").to_string()),
            );
        }

        let path = format!("/rest/v1/doctor_schedules?id=eq.{}", schedule_id);
        let result: Vec<DoctorSchedule> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(return_representation()),
            )
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(DoctorError::ScheduleNotFound)
    }

    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<(), DoctorError> {
        debug!("Deleting schedule {}", schedule_id);

        let path = format!("/rest/v1/doctor_schedules?id=eq.{}", schedule_id);
        let result: Vec<DoctorSchedule> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(return_representation()),
            )
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(DoctorError::ScheduleNotFound);
        }

        Ok(())
    }

    /// Working-hours row covering the given instant, if any. Start is
    /// inclusive, end exclusive.
    pub async fn find_covering(
        &self,
        doctor_id: i64,
        day: WeekDay,
        time: NaiveTime,
    ) -> Result<Option<DoctorSchedule>, DoctorError> {
        let time_str = time.format("%H:%M:%S").to_string();
        let path = format!(
            "/rest/v1/doctor_schedules?doctor_id=eq.{}&day=eq.{}&start_time=lte.{}&end_time=gt.{}",
            doctor_id, day, time_str, time_str
        );

        let result: Vec<DoctorSchedule> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(result.into_iter().next())
    }

    async fn get_schedule(&self, schedule_id: i64) -> Result<DoctorSchedule, DoctorError> {
        let path = format!("/rest/v1/doctor_schedules?id=eq.{}", schedule_id);
        let result: Vec<DoctorSchedule> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(DoctorError::ScheduleNotFound)
    }

    async fn require_doctor(&self, doctor_id: i64) -> Result<(), DoctorError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Doctor> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(DoctorError::NotFound);
        }

        Ok(())
    }
}
