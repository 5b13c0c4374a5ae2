//! Client for the spreadsheet-backed user service
//!
//! The service exposes a single endpoint taking `{"action": ...}` JSON
//! bodies and answering `{"success": bool, "user"?: {...}, "error"?: "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{RemoteUser, UserDirectory};
use crate::core::error::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum SheetsRequest<'a> {
    GetUser { email: &'a str, password: &'a str },
    SaveUser { user: &'a RemoteUser },
}

#[derive(Debug, Deserialize)]
struct SheetsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    user: Option<RemoteUser>,
    #[serde(default)]
    error: Option<String>,
}

/// Remote user directory reached over HTTP
pub struct SheetsUserDirectory {
    client: reqwest::Client,
    url: String,
}

impl SheetsUserDirectory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("CivicBridgeCore/0.1 (remote-user-sync)")
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn call(&self, request: &SheetsRequest<'_>) -> Result<SheetsResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Remote directory unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Remote directory returned HTTP {}",
                status
            )));
        }

        response.json::<SheetsResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid remote directory response: {}", e))
        })
    }
}

#[async_trait]
impl UserDirectory for SheetsUserDirectory {
    async fn get_user(&self, email: &str, password: &str) -> Result<Option<RemoteUser>> {
        tracing::debug!("Looking up {} in remote directory", email);

        let response = self
            .call(&SheetsRequest::GetUser { email, password })
            .await?;

        if !response.success {
            tracing::debug!(
                "Remote directory miss for {}: {}",
                email,
                response.error.as_deref().unwrap_or("no details")
            );
            return Ok(None);
        }

        Ok(response.user)
    }

    async fn save_user(&self, user: &RemoteUser) -> Result<()> {
        let response = self.call(&SheetsRequest::SaveUser { user }).await?;

        if !response.success {
            return Err(AppError::ExternalServiceError(
                response
                    .error
                    .unwrap_or_else(|| "Remote directory rejected the user".to_string()),
            ));
        }

        tracing::info!("Saved user {} to remote directory", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn exec(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match body["action"].as_str() {
            Some("getUser") if body["email"] == "jane@example.com" && body["password"] == "pw" => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "user": {"id": 42, "fullName": "Jane", "email": "jane@example.com", "role": "user"}
                })),
            ),
            Some("getUser") => (
                StatusCode::OK,
                Json(json!({"success": false, "error": "User not found"})),
            ),
            Some("saveUser") if body["user"]["email"] == "full@example.com" => (
                StatusCode::OK,
                Json(json!({"success": false, "error": "Sheet is full"})),
            ),
            Some("saveUser") => (StatusCode::OK, Json(json!({"success": true}))),
            _ => (StatusCode::BAD_REQUEST, Json(json!({"success": false}))),
        }
    }

    async fn spawn_directory() -> String {
        let app = Router::new().route("/exec", post(exec));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/exec", addr)
    }

    fn remote_user(email: &str) -> RemoteUser {
        RemoteUser {
            id: "u1".to_string(),
            full_name: Some("Someone".to_string()),
            email: email.to_string(),
            role: Some("user".to_string()),
            created_at: None,
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_get_user_hit_and_miss() {
        let url = spawn_directory().await;
        let directory = SheetsUserDirectory::new(url, Duration::from_secs(5)).unwrap();

        let hit = directory.get_user("jane@example.com", "pw").await.unwrap();
        let hit = hit.expect("user should be found");
        assert_eq!(hit.id, "42");
        assert_eq!(hit.full_name.as_deref(), Some("Jane"));

        let miss = directory.get_user("jane@example.com", "wrong").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_save_user_reports_rejection() {
        let url = spawn_directory().await;
        let directory = SheetsUserDirectory::new(url, Duration::from_secs(5)).unwrap();

        directory
            .save_user(&remote_user("ok@example.com"))
            .await
            .unwrap();

        let rejected = directory.save_user(&remote_user("full@example.com")).await;
        assert!(
            matches!(rejected, Err(AppError::ExternalServiceError(ref msg)) if msg == "Sheet is full")
        );
    }

    #[tokio::test]
    async fn test_http_error_status_is_failure() {
        let url = spawn_directory().await;
        // Unknown path answers 404
        let directory =
            SheetsUserDirectory::new(url.replace("/exec", "/missing"), Duration::from_secs(5))
                .unwrap();

        let result = directory.get_user("jane@example.com", "pw").await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let directory =
            SheetsUserDirectory::new(format!("http://{}/exec", addr), Duration::from_secs(2))
                .unwrap();
        let result = directory.get_user("jane@example.com", "pw").await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
