use std::collections::HashMap;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::{return_representation, StoreError};
use shared_database::routing::{EntityGroup, StoreRouter};

use crate::models::{
    CreateDoctorRequest, CreateSpecialtyRequest, Doctor, DoctorError, DoctorListRow,
    Specialty, UpdateDoctorRequest,
};

pub struct DoctorService {
    store: StoreRouter,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorListRow>, DoctorError> {
        debug!("Listing doctors");

        let doctors: Vec<Doctor> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(
                Method::GET,
                "/rest/v1/doctors?order=last_name.asc,first_name.asc",
                None,
            )
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let specialties = self.specialty_names().await?;

        let rows = doctors
            .into_iter()
            .map(|d| DoctorListRow {
                id: d.id,
                specialty: specialties
                    .get(&d.specialty_id)
                    .cloned()
                    .unwrap_or_else(|| "-".to_string()),
                first_name: d.first_name,
                last_name: d.last_name,
                phone: d.phone,
                is_available: d.is_available,
            })
            .collect();

        Ok(rows)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Doctor> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!(
            "Creating doctor {} {}",
            request.first_name, request.last_name
        );

        self.get_specialty(request.specialty_id).await?;

        let doctor_data = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "specialty_id": request.specialty_id,
            "phone": request.phone,
            "is_available": request.is_available.unwrap_or(true),
        });

        let result: Vec<Doctor> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/doctors",
                Some(doctor_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::DatabaseError("insert returned no row".to_string()))
    }

    pub async fn update_doctor(
        &self,
        doctor_id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor {}", doctor_id);

        if let Some(specialty_id) = request.specialty_id {
            self.get_specialty(specialty_id).await?;
        }

        let mut update_data = serde_json::Map::new();
        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(specialty_id) = request.specialty_id {
            update_data.insert("specialty_id".to_string(), json!(specialty_id));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(is_available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(is_available));
        }

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Doctor> = self
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

        result.into_iter().next().ok_or(DoctorError::NotFound)
    }

    pub async fn list_specialties(&self) -> Result<Vec<Specialty>, DoctorError> {
        let result: Vec<Specialty> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, "/rest/v1/specialties?order=name.asc", None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn create_specialty(
        &self,
        request: CreateSpecialtyRequest,
    ) -> Result<Specialty, DoctorError> {
        debug!("Creating specialty {}", request.name);

        let result: Vec<Specialty> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/specialties",
                Some(json!({ "name": request.name })),
                Some(return_representation()),
            )
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    DoctorError::DatabaseError("specialty name already exists".to_string())
                }
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::DatabaseError("insert returned no row".to_string()))
    }

    async fn get_specialty(&self, specialty_id: i64) -> Result<Specialty, DoctorError> {
        let path = format!("/rest/v1/specialties?id=eq.{}", specialty_id);
        let result: Vec<Specialty> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(DoctorError::SpecialtyNotFound)
    }

    async fn specialty_names(&self) -> Result<HashMap<i64, String>, DoctorError> {
        let specialties = self.list_specialties().await?;
        Ok(specialties.into_iter().map(|s| (s.id, s.name)).collect())
    }
}
