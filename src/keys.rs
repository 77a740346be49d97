/// Access Key Broker
///
/// Exchanges a verified client access token for the server's stored API key.
/// The stored key is itself a signed token and must verify against the
/// server secret before it is released, so a leaked client secret alone is
/// not enough to obtain a usable key.
use crate::auth;
use crate::config::AuthConfig;
use crate::store::model::ApiKeyRecord;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct KeyBroker {
    pool: Option<SqlitePool>,
    secret: String,
    client_secret: String,
    subject: String,
}

impl KeyBroker {
    pub fn new(pool: Option<SqlitePool>, auth: &AuthConfig) -> Self {
        Self {
            pool,
            secret: auth.secret.clone(),
            client_secret: auth.client_secret.clone(),
            subject: auth.auth_user.clone(),
        }
    }

    /// Fetch the key document for the configured subject and verify its own
    /// signature. `None` on a missing document, a failed verification, or an
    /// unavailable keys collection.
    pub async fn stored_key(&self) -> Option<String> {
        let pool = self.pool.as_ref()?;

        let row = match sqlx::query("SELECT subject, key FROM api_keys WHERE subject = ?")
            .bind(&self.subject)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row?,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch stored API key");
                return None;
            }
        };

        let record = ApiKeyRecord {
            subject: row.get("subject"),
            key: row.get("key"),
        };

        if !auth::verify_token(&record.key, &self.secret, &self.subject) {
            tracing::warn!("stored API key failed signature verification");
            return None;
        }

        Some(record.key)
    }

    /// Two-tier exchange: the presented client token must verify against the
    /// client secret before the stored key is fetched and released.
    pub async fn exchange(&self, access_token: &str) -> Option<String> {
        if !auth::verify_token(access_token, &self.client_secret, &self.subject) {
            return None;
        }

        self.stored_key().await
    }
}
