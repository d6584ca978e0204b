use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::token::verify_token;

/// Middleware guarding mutating routes: the request must carry a valid
/// operator session token. Every failure mode (missing header, bad
/// signature, expired token, wrong grant) is a 403, the single outcome
/// non-operators see.
pub async fn operator_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Forbidden("Operator session required".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Forbidden(
            "Invalid authorization header format".to_string(),
        ));
    }

    let token = &auth_value[7..];

    let session = verify_token(token, &config.session_signing_key)
        .map_err(AppError::Forbidden)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
