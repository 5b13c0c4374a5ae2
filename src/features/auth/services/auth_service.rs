use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Role, Session, SessionIdentity};
use super::password::PasswordHasher;
use crate::features::auth::services::session_service::SessionService;
use crate::features::reports::services::ReportService;
use crate::features::users::models::{User, UserActivity, UserSummary};
use crate::features::users::services::UserService;
use crate::modules::remote_sync::{RemoteUser, UserDirectory};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const DEMO_USER_ID: &str = "demo";
const DEMO_USER_NAME: &str = "Demo User";

/// Result of a successful signup
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub session: Session,
    pub user: UserSummary,
    /// Whether the remote directory accepted the new account
    pub remote_synced: bool,
}

/// Service for authentication operations (login, signup, logout)
pub struct AuthService {
    config: AuthConfig,
    hasher: PasswordHasher,
    sessions: Arc<SessionService>,
    users: Arc<UserService>,
    reports: Arc<ReportService>,
    directory: Arc<dyn UserDirectory>,
}

impl AuthService {
    pub fn new(
        config: AuthConfig,
        sessions: Arc<SessionService>,
        users: Arc<UserService>,
        reports: Arc<ReportService>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            hasher: PasswordHasher::new(config.password_hash_cost),
            config,
            sessions,
            users,
            reports,
            directory,
        }
    }

    /// Login with email and password.
    ///
    /// Sources are tried in order: administrator credentials, the remote
    /// directory, the local users collection, then the demo account.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let admin = &self.config.admin;
        if email == admin.email && password == admin.password {
            return self.sessions.issue(self.admin_identity()).await;
        }

        let identity = match self.remote_lookup(email, password).await {
            Some(user) => SessionIdentity::for_user(user),
            None => match self.local_lookup(email, password).await? {
                Some(user) => SessionIdentity::for_user(user),
                None => self
                    .demo_identity(email, password)
                    .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?,
            },
        };

        let session = self.sessions.issue(identity).await?;
        if !session.is_admin() {
            self.refresh_activity(&session.email).await;
        }
        Ok(session)
    }

    /// Login with the administrator username and password
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<Session> {
        let admin = &self.config.admin;
        if username.trim() != admin.username || password != admin.password {
            tracing::warn!("Rejected administrator login for '{}'", username);
            return Err(AppError::Unauthorized(
                "Invalid administrator credentials".to_string(),
            ));
        }

        self.sessions.issue(self.admin_identity()).await
    }

    /// Register a local account, mirror it to the remote directory and sign
    /// the new user in
    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<SignupOutcome> {
        let full_name = full_name.trim();
        let email = email.trim();

        if email.eq_ignore_ascii_case(&self.config.admin.email) {
            return Err(AppError::Validation(
                "This email is reserved".to_string(),
            ));
        }
        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if password != confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }
        if self.users.email_exists(email).await {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7().to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash),
            password: None,
            role: Role::User,
            created_at: Some(now),
            profile: UserActivity {
                joined: Some(now),
                reports_count: Some(0),
                last_active: Some(now),
            },
        };

        let remote_synced = match self.directory.save_user(&RemoteUser::from(&user)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Remote sync failed for new user {}: {}", email, e);
                false
            }
        };

        let user = self.users.insert(user).await?;
        let summary = UserSummary::from(&user);
        let session = self
            .sessions
            .issue(SessionIdentity::for_user(summary.clone()))
            .await?;

        Ok(SignupOutcome {
            session,
            user: summary,
            remote_synced,
        })
    }

    /// End the session. Stored preferences are left in place.
    pub async fn logout(&self, session: &Session) -> Result<()> {
        if !session.is_admin() {
            if let Err(e) = self.users.touch_last_active(&session.email).await {
                tracing::warn!("Failed to record last activity for {}: {}", session.email, e);
            }
        }

        self.sessions.end(session).await
    }

    fn admin_identity(&self) -> SessionIdentity {
        SessionIdentity {
            email: self.config.admin.email.clone(),
            name: self.config.admin.display_name.clone(),
            role: Role::Admin,
            user: None,
        }
    }

    /// Remote directory lookup. Failures are logged and treated as a miss.
    async fn remote_lookup(&self, email: &str, password: &str) -> Option<UserSummary> {
        match self.directory.get_user(email, password).await {
            Ok(user) => user.map(UserSummary::from),
            Err(e) => {
                tracing::warn!("Remote login lookup failed, using local users: {}", e);
                None
            }
        }
    }

    /// Verify against the local users collection. A matching plaintext
    /// password is replaced with a hash.
    async fn local_lookup(&self, email: &str, password: &str) -> Result<Option<UserSummary>> {
        let Some(user) = self.users.find_by_email(email).await else {
            return Ok(None);
        };

        let verified = match (&user.password_hash, &user.password) {
            (Some(hash), _) => self.hasher.verify(password, hash).await?,
            (None, Some(plain)) => {
                let matched = password == plain.as_str();
                if matched {
                    self.upgrade_legacy_password(email, password).await;
                }
                matched
            }
            (None, None) => false,
        };

        Ok(verified.then(|| UserSummary::from(&user)))
    }

    /// Replace a plaintext password with its hash. Failures leave the
    /// plaintext in place for the next login.
    async fn upgrade_legacy_password(&self, email: &str, password: &str) {
        let upgraded = match self.hasher.hash(password).await {
            Ok(hash) => self.users.upgrade_credentials(email, hash).await,
            Err(e) => Err(e),
        };
        if let Err(e) = upgraded {
            tracing::warn!("Failed to upgrade credentials for {}: {}", email, e);
        }
    }

    fn demo_identity(&self, email: &str, password: &str) -> Option<SessionIdentity> {
        let demo = self.config.demo.as_ref()?;
        if email != demo.email || password != demo.password {
            return None;
        }

        Some(SessionIdentity::for_user(UserSummary {
            id: DEMO_USER_ID.to_string(),
            full_name: DEMO_USER_NAME.to_string(),
            email: demo.email.clone(),
            role: Role::User,
            created_at: None,
        }))
    }

    async fn refresh_activity(&self, email: &str) {
        let count = self.reports.count_by_reporter(email).await;
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        if let Err(e) = self.users.record_activity(email, count).await {
            tracing::warn!("Failed to refresh activity for {}: {}", email, e);
        }
    }
}
