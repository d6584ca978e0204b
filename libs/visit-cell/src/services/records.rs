use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::return_representation;
use shared_database::routing::{EntityGroup, StoreRouter};

use crate::models::{
    CreateDiagnosisRequest, CreateRecipeRequest, Diagnosis, Recipe, Visit, VisitError,
};

/// Diagnosis catalog and per-visit prescriptions.
pub struct RecordsService {
    store: StoreRouter,
}

impl RecordsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreRouter::new(config),
        }
    }

    pub async fn list_diagnoses(&self) -> Result<Vec<Diagnosis>, VisitError> {
        let result: Vec<Diagnosis> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, "/rest/v1/diagnoses?order=name.asc", None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn create_diagnosis(
        &self,
        request: CreateDiagnosisRequest,
    ) -> Result<Diagnosis, VisitError> {
        debug!("Creating diagnosis {}", request.name);

        let result: Vec<Diagnosis> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/diagnoses",
                Some(json!({ "name": request.name })),
                Some(return_representation()),
            )
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| VisitError::DatabaseError("insert returned no row".to_string()))
    }

    pub async fn list_recipes(&self, visit_id: i64) -> Result<Vec<Recipe>, VisitError> {
        debug!("Listing prescriptions for visit {}", visit_id);

        self.require_visit(visit_id).await?;

        let path = format!("/rest/v1/recipes?visit_id=eq.{}&order=id.asc", visit_id);
        let result: Vec<Recipe> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn create_recipe(
        &self,
        visit_id: i64,
        request: CreateRecipeRequest,
    ) -> Result<Recipe, VisitError> {
        debug!("Adding prescription to visit {}", visit_id);

        self.require_visit(visit_id).await?;

        let recipe_data = json!({
            "visit_id": visit_id,
            "drug": request.drug,
            "instructions": request.instructions,
        });

        let result: Vec<Recipe> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(
                Method::POST,
                "/rest/v1/recipes",
                Some(recipe_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| VisitError::DatabaseError("insert returned no row".to_string()))
    }

    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<(), VisitError> {
        debug!("Deleting prescription {}", recipe_id);

        let path = format!("/rest/v1/recipes?id=eq.{}", recipe_id);
        let result: Vec<Recipe> = self
            .store
            .write(EntityGroup::OperatorManaged)
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?
            .request_with_headers(Method::DELETE, &path, None, Some(return_representation()))
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(VisitError::RecipeNotFound);
        }

        Ok(())
    }

    async fn require_visit(&self, visit_id: i64) -> Result<(), VisitError> {
        let path = format!("/rest/v1/visits?id=eq.{}", visit_id);
        let result: Vec<Visit> = self
            .store
            .read(EntityGroup::OperatorManaged)
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| VisitError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(VisitError::VisitNotFound);
        }

        Ok(())
    }
}
