use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::TokenResponse;
use shared_utils::token::{issue_token, verify_token};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub access_code: String,
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Exchange the shared reception-desk access code for a signed operator
/// session token.
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Operator login attempt");

    if config.operator_access_code.is_empty() {
        warn!("Operator login attempted but no access code is configured");
        return Err(AppError::Auth("Operator login is disabled".to_string()));
    }

    if request.access_code != config.operator_access_code {
        return Err(AppError::Auth("Invalid access code".to_string()));
    }

    let token = issue_token(&config.session_signing_key, config.session_ttl_minutes)
        .map_err(AppError::Internal)?;
    let expires_at = Utc::now() + Duration::minutes(config.session_ttl_minutes);

    info!("Operator session issued");

    Ok(Json(json!({
        "token": token,
        "expires_at": expires_at,
    })))
}

/// Report whether the presented session token is still valid.
pub async fn verify(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Verifying operator session token");

    let token = extract_bearer_token(&headers)?;

    match verify_token(&token, &config.session_signing_key) {
        Ok(session) => Ok(Json(TokenResponse {
            valid: true,
            expires_at: Some(session.expires_at),
        })),
        Err(_) => Ok(Json(TokenResponse {
            valid: false,
            expires_at: None,
        })),
    }
}
