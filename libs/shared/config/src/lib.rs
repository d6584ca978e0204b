use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_store_url: String,
    pub default_store_key: String,
    pub client_store_url: String,
    pub client_store_key: String,
    pub operator_access_code: String,
    pub session_signing_key: String,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            default_store_url: env::var("DEFAULT_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("DEFAULT_STORE_URL not set, using empty value");
                    String::new()
                }),
            default_store_key: env::var("DEFAULT_STORE_KEY")
                .unwrap_or_else(|_| {
                    warn!("DEFAULT_STORE_KEY not set, using empty value");
                    String::new()
                }),
            client_store_url: env::var("CLIENT_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("CLIENT_STORE_URL not set, using empty value");
                    String::new()
                }),
            client_store_key: env::var("CLIENT_STORE_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLIENT_STORE_KEY not set, using empty value");
                    String::new()
                }),
            operator_access_code: env::var("OPERATOR_ACCESS_CODE")
                .unwrap_or_else(|_| {
                    warn!("OPERATOR_ACCESS_CODE not set, operator login is disabled");
                    String::new()
                }),
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .unwrap_or_else(|_| {
                    warn!("SESSION_SIGNING_KEY not set, using empty value");
                    String::new()
                }),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(480),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.default_store_url.is_empty()
            && !self.default_store_key.is_empty()
            && !self.session_signing_key.is_empty()
    }

    pub fn is_client_store_configured(&self) -> bool {
        !self.client_store_url.is_empty() && !self.client_store_key.is_empty()
    }
}
