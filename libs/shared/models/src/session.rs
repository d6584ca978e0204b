use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grant carried by an operator session token. The only capability this
/// application knows about is full reception-desk access.
pub const OPERATOR_GRANT: &str = "operator";

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Token id, unique per issued session.
    pub jti: Uuid,
    /// Capability grant, `operator` for reception-desk sessions.
    pub grant: String,
    pub iat: i64,
    pub exp: i64,
}

/// A verified operator session, injected into request extensions by the
/// operator guard middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorSession {
    pub token_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OperatorSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub expires_at: Option<DateTime<Utc>>,
}
