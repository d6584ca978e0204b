use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;

use crate::token::issue_token;

pub struct TestConfig {
    pub default_store_url: String,
    pub default_store_key: String,
    pub client_store_url: String,
    pub client_store_key: String,
    pub operator_access_code: String,
    pub session_signing_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            default_store_url: "http://localhost:54321".to_string(),
            default_store_key: "test-default-key".to_string(),
            client_store_url: "http://localhost:54322".to_string(),
            client_store_key: "test-client-key".to_string(),
            operator_access_code: "reception-desk-code".to_string(),
            session_signing_key: "test-signing-key-for-session-tokens".to_string(),
        }
    }
}

impl TestConfig {
    /// Point both stores at one mock server.
    pub fn with_store_url(url: &str) -> Self {
        Self {
            default_store_url: url.to_string(),
            client_store_url: url.to_string(),
            ..Self::default()
        }
    }

    /// Separate mock servers for the read-write and read-only stores.
    pub fn with_store_urls(default_url: &str, client_url: &str) -> Self {
        Self {
            default_store_url: default_url.to_string(),
            client_store_url: client_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            default_store_url: self.default_store_url.clone(),
            default_store_key: self.default_store_key.clone(),
            client_store_url: self.client_store_url.clone(),
            client_store_key: self.client_store_key.clone(),
            operator_access_code: self.operator_access_code.clone(),
            session_signing_key: self.session_signing_key.clone(),
            session_ttl_minutes: 60,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn operator_token(&self) -> String {
        issue_token(&self.session_signing_key, 60).expect("test token")
    }

    pub fn expired_operator_token(&self) -> String {
        issue_token(&self.session_signing_key, -1).expect("test token")
    }
}

/// Canned store rows for mock responses.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn doctor(id: i64, first_name: &str, last_name: &str, is_available: bool) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "specialty_id": 1,
            "phone": null,
            "is_available": is_available
        })
    }

    pub fn patient(id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "birth_date": "1985-04-12",
            "gender": "female",
            "phone": null,
            "registered": "2024-01-15"
        })
    }

    pub fn schedule(id: i64, doctor_id: i64, day: &str, start: &str, end: &str) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "day": day,
            "start_time": start,
            "end_time": end
        })
    }

    pub fn visit(id: i64, patient_id: i64, doctor_id: i64, date: &str, time: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "visit_day": "monday",
            "visit_date": date,
            "visit_time": time,
            "diagnosis_id": null,
            "status": status,
            "created": "2024-06-01"
        })
    }

    pub fn specialty(id: i64, name: &str) -> serde_json::Value {
        json!({ "id": id, "name": name })
    }

    pub fn diagnosis(id: i64, name: &str) -> serde_json::Value {
        json!({ "id": id, "name": name })
    }

    pub fn recipe(id: i64, visit_id: i64, drug: &str) -> serde_json::Value {
        json!({
            "id": id,
            "visit_id": visit_id,
            "drug": drug,
            "instructions": null
        })
    }
}
