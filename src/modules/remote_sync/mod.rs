//! Remote user directory
//!
//! A best-effort secondary source of user accounts backed by a spreadsheet
//! web service. The local store stays the source of truth: callers log
//! every error returned here and fall back to local data.

mod sheets_client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::shared::serde_ext::id_from_string_or_number;

pub use sheets_client::SheetsUserDirectory;

/// User record as exchanged with the remote directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by credentials. `Ok(None)` is a miss.
    async fn get_user(&self, email: &str, password: &str) -> Result<Option<RemoteUser>>;

    async fn save_user(&self, user: &RemoteUser) -> Result<()>;
}

/// Directory used when no remote service is configured
pub struct DisabledUserDirectory;

#[async_trait]
impl UserDirectory for DisabledUserDirectory {
    async fn get_user(&self, _email: &str, _password: &str) -> Result<Option<RemoteUser>> {
        Err(unavailable())
    }

    async fn save_user(&self, _user: &RemoteUser) -> Result<()> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::ExternalServiceError("Remote user directory is not configured".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_directory_is_unavailable() {
        let directory = DisabledUserDirectory;

        let lookup = directory.get_user("a@example.com", "secret").await;
        assert!(matches!(lookup, Err(AppError::ExternalServiceError(_))));

        let user = RemoteUser {
            id: "1".to_string(),
            full_name: None,
            email: "a@example.com".to_string(),
            role: None,
            created_at: None,
            password_hash: None,
        };
        assert!(directory.save_user(&user).await.is_err());
    }
}
