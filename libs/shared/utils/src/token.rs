use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_models::session::{OperatorSession, SessionClaims, TokenHeader, OPERATOR_GRANT};

type HmacSha256 = Hmac<Sha256>;

/// Issue a signed operator session token: `header.claims.signature`, all
/// three parts base64url without padding.
pub fn issue_token(signing_key: &str, ttl_minutes: i64) -> Result<String, String> {
    if signing_key.is_empty() {
        return Err("Session signing key is not set".to_string());
    }

    let now = Utc::now();
    let header = TokenHeader {
        alg: "HS256".to_string(),
        typ: "session".to_string(),
    };
    let claims = SessionClaims {
        jti: Uuid::new_v4(),
        grant: OPERATOR_GRANT.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
    };

    let header_json = serde_json::to_string(&header)
        .map_err(|_| "Failed to encode token header".to_string())?;
    let claims_json = serde_json::to_string(&claims)
        .map_err(|_| "Failed to encode token claims".to_string())?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(signing_key.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verify a session token and require the operator grant.
pub fn verify_token(token: &str, signing_key: &str) -> Result<OperatorSession, String> {
    if signing_key.is_empty() {
        return Err("Session signing key is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(signing_key.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: SessionClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if claims.grant != OPERATOR_GRANT {
        debug!("Token carries grant {:?}, operator required", claims.grant);
        return Err("Token does not carry the operator grant".to_string());
    }

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    let issued_at = Utc
        .timestamp_opt(claims.iat, 0)
        .single()
        .ok_or_else(|| "Invalid issue timestamp".to_string())?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| "Invalid expiry timestamp".to_string())?;

    let session = OperatorSession {
        token_id: claims.jti,
        issued_at,
        expires_at,
    };

    debug!("Session token validated, id {}", session.token_id);
    Ok(session)
}
