//! Fixtures shared by unit and router tests

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};

use crate::core::config::{AdminCredentials, AuthConfig, DemoAccount};
use crate::core::error::{AppError, Result};
use crate::core::router::{api_router, AppServices};
use crate::features::auth::model::{Role, Session, SessionIdentity};
use crate::features::users::models::{User, UserActivity, UserSummary};
use crate::modules::remote_sync::{RemoteUser, UserDirectory};
use crate::modules::storage::LocalStore;

pub const ADMIN_EMAIL: &str = "admin@CivicBridge.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_EMAIL: &str = "demo@CivicBridge.com";
pub const DEMO_PASSWORD: &str = "password";

/// Password of every user built by `stored_user`
pub const STORED_PASSWORD: &str = "secret1";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        admin: AdminCredentials {
            username: "admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            display_name: "Administrator".to_string(),
        },
        demo: Some(DemoAccount {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }),
        session_ttl: Duration::hours(1),
        min_password_length: 6,
        password_hash_cost: 4,
    }
}

pub fn admin_session() -> Session {
    Session::new(
        "admin-token".to_string(),
        SessionIdentity {
            email: ADMIN_EMAIL.to_string(),
            name: "Administrator".to_string(),
            role: Role::Admin,
            user: None,
        },
        Duration::hours(1),
    )
}

pub fn user_session(email: &str, name: &str) -> Session {
    let summary = UserSummary {
        id: format!("id-{}", email),
        full_name: name.to_string(),
        email: email.to_string(),
        role: Role::User,
        created_at: None,
    };
    Session::new(
        format!("token-{}", email),
        SessionIdentity::for_user(summary),
        Duration::hours(1),
    )
}

/// A hashed-password user whose password is `STORED_PASSWORD`
pub fn stored_user(email: &str, name: &str) -> User {
    let now = Utc::now();
    User {
        id: format!("id-{}", email),
        full_name: name.to_string(),
        email: email.to_string(),
        password_hash: Some(bcrypt::hash(STORED_PASSWORD, 4).unwrap()),
        password: None,
        role: Role::User,
        created_at: Some(now),
        profile: UserActivity {
            joined: Some(now),
            reports_count: Some(0),
            last_active: None,
        },
    }
}

/// In-process stand-in for the remote user directory
pub struct StubDirectory {
    user: Option<(RemoteUser, String)>,
    reachable: bool,
}

impl StubDirectory {
    pub fn unreachable() -> Self {
        Self {
            user: None,
            reachable: false,
        }
    }

    /// Reachable directory that knows nobody and accepts every save
    pub fn accepting() -> Self {
        Self {
            user: None,
            reachable: true,
        }
    }

    pub fn with_user(user: RemoteUser, password: &str) -> Self {
        Self {
            user: Some((user, password.to_string())),
            reachable: true,
        }
    }
}

#[async_trait]
impl UserDirectory for StubDirectory {
    async fn get_user(&self, email: &str, password: &str) -> Result<Option<RemoteUser>> {
        if !self.reachable {
            return Err(AppError::ExternalServiceError("unreachable".to_string()));
        }
        Ok(self
            .user
            .as_ref()
            .filter(|(user, pw)| user.email == email && pw == password)
            .map(|(user, _)| user.clone()))
    }

    async fn save_user(&self, _user: &RemoteUser) -> Result<()> {
        if !self.reachable {
            return Err(AppError::ExternalServiceError("unreachable".to_string()));
        }
        Ok(())
    }
}

/// Services over a fresh in-memory store with an unreachable remote directory
pub fn test_services() -> AppServices {
    AppServices::new(
        Arc::new(LocalStore::in_memory()),
        test_auth_config(),
        Arc::new(StubDirectory::unreachable()),
    )
}

pub fn test_server(services: &AppServices) -> TestServer {
    TestServer::new(api_router(services)).unwrap()
}
