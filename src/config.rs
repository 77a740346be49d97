/// Configuration management for the Daylog service
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_location: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret the stored API key is signed with
    pub secret: String,
    /// Secret client access tokens are signed with
    pub client_secret: String,
    /// Expected subject claim on both token tiers
    pub auth_user: String,
    /// Header / cookie name the API key is presented under
    pub api_key_name: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("DAYLOG_HOSTNAME").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("DAYLOG_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;

        let db_location: PathBuf = env::var("DAYLOG_DB_LOCATION")
            .unwrap_or_else(|_| "./data/daylog.sqlite".to_string())
            .into();

        let secret = env::var("DAYLOG_SECRET")
            .map_err(|_| ApiError::Validation("Signing secret required".to_string()))?;
        let client_secret = env::var("DAYLOG_CLIENT_SECRET")
            .map_err(|_| ApiError::Validation("Client secret required".to_string()))?;
        let auth_user = env::var("DAYLOG_AUTH_USER")
            .map_err(|_| ApiError::Validation("Auth user required".to_string()))?;
        let api_key_name =
            env::var("DAYLOG_API_KEY_NAME").unwrap_or_else(|_| "access_token".to_string());

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig { db_location },
            authentication: AuthConfig {
                secret,
                client_secret,
                auth_user,
                api_key_name,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.secret.len() < 16 {
            return Err(ApiError::Validation(
                "Signing secret must be at least 16 characters".to_string(),
            ));
        }

        if self.authentication.client_secret.len() < 16 {
            return Err(ApiError::Validation(
                "Client secret must be at least 16 characters".to_string(),
            ));
        }

        if self.authentication.auth_user.is_empty() {
            return Err(ApiError::Validation(
                "Auth user cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
