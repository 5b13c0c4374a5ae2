use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::auth::model::Role;
use crate::modules::remote_sync::RemoteUser;
use crate::shared::serde_ext::id_from_string_or_number;

/// Activity counters kept alongside each user record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

/// Stored user record (element of the `users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    /// bcrypt hash (`$2b$<cost>$...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Plaintext password written by older clients; replaced on next login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile: UserActivity,
}

/// Credential-free view of a user, safe to embed in sessions and responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Name shown in the UI; falls back to "User" like the dashboard did
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            "User"
        } else {
            name
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<RemoteUser> for UserSummary {
    fn from(remote: RemoteUser) -> Self {
        let role = match remote.role.as_deref() {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };
        Self {
            id: remote.id,
            full_name: remote.full_name.unwrap_or_default(),
            email: remote.email,
            role,
            created_at: remote.created_at,
        }
    }
}

impl From<&User> for RemoteUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: Some(user.full_name.clone()),
            email: user.email.clone(),
            role: Some(user.role.to_string()),
            created_at: user.created_at,
            password_hash: user.password_hash.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_record() {
        let raw = r#"{
            "id": 1704067200000,
            "fullName": "Jane Citizen",
            "email": "jane@example.com",
            "password": "secret1",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "role": "user",
            "profile": {"joined": "2024-01-01T00:00:00.000Z", "reportsCount": 2}
        }"#;

        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, "1704067200000");
        assert_eq!(user.password.as_deref(), Some("secret1"));
        assert!(user.password_hash.is_none());
        assert_eq!(user.profile.reports_count, Some(2));
        assert!(user.profile.last_active.is_none());
    }

    #[test]
    fn test_missing_profile_and_role_default() {
        let raw = r#"{"id": "demo", "fullName": "Demo User", "email": "demo@example.com",
                      "createdAt": "2024-01-01T00:00:00Z"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.profile, UserActivity::default());
    }

    #[test]
    fn test_sparse_legacy_record_round_trips() {
        let raw = r#"{"id": 42, "email": "sparse@example.com", "password": "secret1"}"#;

        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.full_name, "");
        assert!(user.created_at.is_none());
        assert_eq!(UserSummary::from(&user).display_name(), "User");

        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("createdAt").is_none());
        let again: User = serde_json::from_value(back).unwrap();
        assert_eq!(again.email, "sparse@example.com");
        assert_eq!(again.password.as_deref(), Some("secret1"));
    }

    #[test]
    fn test_summary_display_name_fallback() {
        let summary = UserSummary {
            id: "1".to_string(),
            full_name: "  ".to_string(),
            email: "x@example.com".to_string(),
            role: Role::User,
            created_at: None,
        };
        assert_eq!(summary.display_name(), "User");
    }

    #[test]
    fn test_remote_role_mapping() {
        let remote = RemoteUser {
            id: "r1".to_string(),
            full_name: Some("Remote Admin".to_string()),
            email: "boss@example.com".to_string(),
            role: Some("admin".to_string()),
            created_at: None,
            password_hash: None,
        };
        let summary = UserSummary::from(remote);
        assert_eq!(summary.role, Role::Admin);
        assert_eq!(summary.display_name(), "Remote Admin");
    }
}
