use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::return_representation;
use shared_database::routing::{EntityGroup, StoreRouter};

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    store: StoreRouter,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing patients");

        let result: Vec<Patient> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(
                Method::GET,
                "/rest/v1/patients?order=last_name.asc,first_name.asc",
                None,
            )
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        debug!("Fetching patient {}", patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Patient> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(PatientError::NotFound)
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!(
            "Registering patient {} {}",
            request.first_name, request.last_name
        );

        let patient_data = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "birth_date": request.birth_date.format("%Y-%m-%d").to_string(),
            "gender": request.gender,
            "phone": request.phone,
            "registered": Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        });

        let result: Vec<Patient> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/patients",
                Some(patient_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| PatientError::DatabaseError("insert returned no row".to_string()))
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient {}", patient_id);

        let mut update_data = serde_json::Map::new();
        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(birth_date) = request.birth_date {
            update_data.insert(
                "birth_date".to_string(),
                json!(birth_date.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Patient> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(return_representation()),
            )
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(PatientError::NotFound)
    }
}
