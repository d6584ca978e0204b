use std::collections::HashMap;

use chrono::Utc;
use futures::try_join;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use doctor_cell::models::Doctor;
use patient_cell::models::Patient;
use shared_config::AppConfig;
use shared_database::postgrest::{return_representation, StoreError};
use shared_database::routing::{EntityGroup, StoreRouter};

use crate::models::{
    CreateVisitRequest, Diagnosis, UpdateVisitRequest, Visit, VisitCandidate, VisitError,
    VisitListRow, VisitStatus,
};
use crate::services::validation::VisitValidator;

pub struct VisitBookingService {
    store: StoreRouter,
    validator: VisitValidator,
}

impl VisitBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
            validator: VisitValidator::new(config),
        }
    }

    /// Book a new visit. Validation runs first; the store's unique index
    /// on (doctor, date, time) has the final word on double booking.
    pub async fn create_visit(&self, request: CreateVisitRequest) -> Result<Visit, VisitError> {
        info!(
            "Booking visit for patient {} with doctor {} on {} at {}",
            request.patient_id, request.doctor_id, request.visit_date, request.visit_time
        );

        self.require_patient(request.patient_id).await?;
        if let Some(diagnosis_id) = request.diagnosis_id {
            self.require_diagnosis(diagnosis_id).await?;
        }

        let candidate = VisitCandidate {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            visit_day: request.visit_day,
            visit_date: request.visit_date,
            visit_time: request.visit_time,
            diagnosis_id: request.diagnosis_id,
            status: VisitStatus::Scheduled,
        };
        self.validator.validate(&candidate).await?;

        let visit_data = json!({
            "patient_id": candidate.patient_id,
            "doctor_id": candidate.doctor_id,
            "visit_day": candidate.visit_day,
            "visit_date": candidate.visit_date.format("%Y-%m-%d").to_string(),
            "visit_time": candidate.visit_time.format("%H:%M:%S").to_string(),
            "diagnosis_id": candidate.diagnosis_id,
            "status": candidate.status,
            "created": Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        });

        let result: Vec<Visit> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/visits",
                Some(visit_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    warn!(
                        "Slot already booked for doctor {} on {} at {}",
                        candidate.doctor_id, candidate.visit_date, candidate.visit_time
                    );
                    VisitError::SlotAlreadyBooked
                }
                other => VisitError::DatabaseError(other.to_string()),
            })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| VisitError::DatabaseError("insert returned no row".to_string()))
    }

    /// Edit an existing visit. The merged record is re-validated as a
    /// whole, the same rules as for a fresh booking.
    pub async fn update_visit(
        &self,
        visit_id: i64,
        request: UpdateVisitRequest,
    ) -> Result<Visit, VisitError> {
        info!("Updating visit {}", visit_id);

        let current = self.get_visit(visit_id).await?;

        let candidate = VisitCandidate {
            patient_id: request.patient_id.unwrap_or(current.patient_id),
            doctor_id: request.doctor_id.unwrap_or(current.doctor_id),
            visit_day: request.visit_day.unwrap_or(current.visit_day),
            visit_date: request.visit_date.unwrap_or(current.visit_date),
            visit_time: request.visit_time.unwrap_or(current.visit_time),
            diagnosis_id: request.diagnosis_id.unwrap_or(current.diagnosis_id),
            status: request.status.unwrap_or(current.status),
        };

        if candidate.patient_id != current.patient_id {
            self.require_patient(candidate.patient_id).await?;
        }
        if let Some(diagnosis_id) = candidate.diagnosis_id {
            if candidate.diagnosis_id != current.diagnosis_id {
                self.require_diagnosis(diagnosis_id).await?;
            }
        }

        self.validator.validate(&candidate).await?;

        let update_data = json!({
            "patient_id": candidate.patient_id,
            "doctor_id": candidate.doctor_id,
            "visit_day": candidate.visit_day,
            "visit_date": candidate.visit_date.format("%Y-%m-%d").to_string(),
            "visit_time": candidate.visit_time.format("%H:%M:%S").to_string(),
            "diagnosis_id": candidate.diagnosis_id,
            "status": candidate.status,
        });

        let path = format!("/rest/v1/visits?id=eq.{}", visit_id);
        let result: Vec<Visit> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(update_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => VisitError::SlotAlreadyBooked,
                other => VisitError::DatabaseError(other.to_string()),
            })?;

        result.into_iter().next().ok_or(VisitError::VisitNotFound)
    }

    /// Remove a visit. Its prescriptions go first; they have no life of
    /// their own once the visit is gone.
    pub async fn delete_visit(&self, visit_id: i64) -> Result<(), VisitError> {
        info!("Deleting visit {}", visit_id);

        self.get_visit(visit_id).await?;

        let store = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        let recipes_path = format!("/rest/v1/recipes?visit_id=eq.{}", visit_id);
        let _: Vec<Value> = store
            .request_with_headers(
                Method::DELETE,
                &recipes_path,
                None,
                Some(return_representation()),
            )
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        let path = format!("/rest/v1/visits?id=eq.{}", visit_id);
        let result: Vec<Visit> = store
            .request_with_headers(Method::DELETE, &path, None, Some(return_representation()))
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(VisitError::VisitNotFound);
        }

        Ok(())
    }

    pub async fn get_visit(&self, visit_id: i64) -> Result<Visit, VisitError> {
        debug!("Fetching visit {}", visit_id);

        let path = format!("/rest/v1/visits?id=eq.{}", visit_id);
        let result: Vec<Visit> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(VisitError::VisitNotFound)
    }

    /// Visit listing with display names, newest first.
    pub async fn list_visits(&self) -> Result<Vec<VisitListRow>, VisitError> {
        debug!("Listing visits");

        let store = self.store.read(EntityGroup::OperatorManaged);

        let (visits, patients, doctors, diagnoses): (
            Vec<Visit>,
            Vec<Patient>,
            Vec<Doctor>,
            Vec<Diagnosis>,
        ) = try_join!(
            store.request(
                Method::GET,
                "/rest/v1/visits?order=visit_date.desc,visit_time.desc",
                None,
            ),
            store.request(Method::GET, "/rest/v1/patients", None),
            store.request(Method::GET, "/rest/v1/doctors", None),
            store.request(Method::GET, "/rest/v1/diagnoses", None),
        )
        .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        let patient_names: HashMap<i64, String> = patients
            .into_iter()
            .map(|p| (p.id, p.full_name()))
            .collect();
        let doctor_names: HashMap<i64, String> = doctors
            .into_iter()
            .map(|d| (d.id, d.full_name()))
            .collect();
        let diagnosis_names: HashMap<i64, String> =
            diagnoses.into_iter().map(|d| (d.id, d.name)).collect();

        let rows = visits
            .into_iter()
            .map(|v| VisitListRow {
                id: v.id,
                patient: patient_names
                    .get(&v.patient_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                doctor: doctor_names
                    .get(&v.doctor_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                visit_date: v.visit_date,
                visit_time: v.visit_time,
                diagnosis: v
                    .diagnosis_id
                    .and_then(|id| diagnosis_names.get(&id).cloned())
                    .unwrap_or_else(|| "-".to_string()),
                status: v.status,
            })
            .collect();

        Ok(rows)
    }

    async fn require_patient(&self, patient_id: i64) -> Result<(), VisitError> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Patient> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(VisitError::PatientNotFound);
        }

        Ok(())
    }

    async fn require_diagnosis(&self, diagnosis_id: i64) -> Result<(), VisitError> {
        let path = format!("/rest/v1/diagnoses?id=eq.{}", diagnosis_id);
        let result: Vec<Diagnosis> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(VisitError::DiagnosisNotFound);
        }

        Ok(())
    }
}
