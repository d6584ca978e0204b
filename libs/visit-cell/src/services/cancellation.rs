use reqwest::Method;
use serde_json::json;
use tracing::info;

use patient_cell::models::Patient;
use shared_config::AppConfig;
use shared_database::postgrest::return_representation;
use shared_database::routing::{EntityGroup, StoreRouter};

use crate::models::{BulkCancelOutcome, Visit, VisitError};

pub struct BulkCancellationService {
    store: StoreRouter,
}

impl BulkCancellationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    /// Cancel every `scheduled` visit of the given patient in one batch
    /// and report how many were affected. Completed and already-cancelled
    /// visits are untouched, which also makes the operation idempotent.
    pub async fn cancel_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<BulkCancelOutcome, VisitError> {
        info!("Cancelling all scheduled visits for patient {}", patient_id);

        self.require_patient(patient_id).await?;

        let path = format!(
            "/rest/v1/visits?patient_id=eq.{}&status=eq.scheduled",
            patient_id
        );
        let cancelled: Vec<Visit> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "status": "cancelled" })),
                Some(return_representation()),
            )
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        info!(
            "Cancelled {} visits for patient {}",
            cancelled.len(),
            patient_id
        );

        Ok(BulkCancelOutcome {
            patient_id,
            cancelled: cancelled.len(),
        })
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
}
