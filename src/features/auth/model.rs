use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::UserSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Authenticated identity behind one bearer token.
///
/// Sessions are stored server-side and handed explicitly to every operation
/// that needs to know who is acting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Snapshot of the user record at login; absent for the administrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Who a new session is issued for
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub user: Option<UserSummary>,
}

impl SessionIdentity {
    pub fn for_user(user: UserSummary) -> Self {
        Self {
            email: user.email.clone(),
            name: user.display_name().to_string(),
            role: user.role,
            user: Some(user),
        }
    }
}

impl Session {
    pub fn new(token: String, identity: SessionIdentity, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token,
            email: identity.email,
            name: identity.name,
            role: identity.role,
            user: identity.user,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Name recorded in `updatedBy` when this session mutates a report
    pub fn actor_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> SessionIdentity {
        SessionIdentity {
            email: "someone@example.com".to_string(),
            name: "Someone".to_string(),
            role,
            user: None,
        }
    }

    #[test]
    fn test_role_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_is_admin() {
        let admin = Session::new("t1".to_string(), identity(Role::Admin), Duration::hours(1));
        let user = Session::new("t2".to_string(), identity(Role::User), Duration::hours(1));
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_expiry() {
        let session = Session::new("t".to_string(), identity(Role::User), Duration::minutes(5));
        assert!(!session.is_expired_at(session.created_at));
        assert!(session.is_expired_at(session.created_at + Duration::minutes(5)));
    }
}
