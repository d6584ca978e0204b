use chrono::Timelike;
use tracing::debug;

use doctor_cell::models::DoctorError;
use doctor_cell::services::doctor::DoctorService;
use doctor_cell::services::schedule::ScheduleService;
use shared_config::AppConfig;
use shared_models::error::ValidationErrors;

use crate::models::{VisitCandidate, VisitError};

/// Minutes between bookable slots.
const SLOT_MINUTES: u32 = 30;

/// Scheduling-rule checks run before a visit is persisted.
///
/// Every rule is evaluated even after an earlier one has failed, so the
/// operator sees the full set of problems at once. The validator only
/// reads doctor and schedule state; it never writes.
pub struct VisitValidator {
    doctor_service: DoctorService,
    schedule_service: ScheduleService,
}

impl VisitValidator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            doctor_service: DoctorService::new(config),
            schedule_service: ScheduleService::new(config),
        }
    }

    pub async fn validate(&self, candidate: &VisitCandidate) -> Result<(), VisitError> {
        debug!(
            "Validating visit for doctor {} on {} at {}",
            candidate.doctor_id, candidate.visit_date, candidate.visit_time
        );

        let mut errors = ValidationErrors::new();

        if candidate.visit_time.minute() % SLOT_MINUTES != 0 {
            errors.add(
                "visit_time",
                format!("Visit time must fall on a {} minute slot", SLOT_MINUTES),
            );
        }

        let doctor = self
            .doctor_service
            .get_doctor(candidate.doctor_id)
            .await
            .map_err(|e| match e {
                DoctorError::NotFound => VisitError::DoctorNotFound,
                other => VisitError::DatabaseError(other.to_string()),
            })?;

        if !doctor.is_available {
            errors.add("doctor_id", "Doctor is temporarily unavailable for booking");
        }

        let covering = self
            .schedule_service
            .find_covering(candidate.doctor_id, candidate.visit_day, candidate.visit_time)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if covering.is_none() {
            errors.add("visit_time", "Doctor does not work on this day or time");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(VisitError::ValidationFailed(errors))
        }
    }
}
