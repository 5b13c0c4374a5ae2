use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Role, Session};
use crate::features::users::dtos::UserProfileResponseDto;
use crate::features::users::models::{Preferences, User, UserActivity};
use crate::modules::storage::LocalStore;
use crate::shared::constants::{PREFERENCES_KEY_PREFIX, USERS_KEY};

/// Service for locally registered users and their preferences
pub struct UserService {
    store: Arc<LocalStore>,
    write_lock: Mutex<()>,
}

impl UserService {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// All users in stored order. A malformed collection reads as empty.
    pub async fn load_all(&self) -> Vec<User> {
        match self.store.load_collection(USERS_KEY).await {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!("Ignoring unreadable users collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Exact-match lookup, as used for login
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.load_all().await.into_iter().find(|u| u.email == email)
    }

    /// Case-insensitive registration check
    pub async fn email_exists(&self, email: &str) -> bool {
        self.load_all()
            .await
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub async fn insert(&self, user: User) -> Result<User> {
        let _guard = self.write_lock.lock().await;
        let mut users: Vec<User> = self.store.load_collection(USERS_KEY).await?;

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        users.push(user.clone());
        self.store.save_collection(USERS_KEY, &users).await?;

        tracing::info!("Registered user {}", user.email);
        Ok(user)
    }

    /// Refresh the report count and last-active time after a login
    pub async fn record_activity(&self, email: &str, reports_count: u32) -> Result<bool> {
        self.mutate(email, |user| {
            user.profile.reports_count = Some(reports_count);
            user.profile.last_active = Some(Utc::now());
        })
        .await
    }

    pub async fn touch_last_active(&self, email: &str) -> Result<bool> {
        self.mutate(email, |user| {
            user.profile.last_active = Some(Utc::now());
        })
        .await
    }

    /// Store a password hash and drop any legacy plaintext password
    pub async fn upgrade_credentials(&self, email: &str, password_hash: String) -> Result<bool> {
        let upgraded = self
            .mutate(email, |user| {
                user.password_hash = Some(password_hash);
                user.password = None;
            })
            .await?;

        if upgraded {
            tracing::info!("Upgraded stored credentials for {}", email);
        }
        Ok(upgraded)
    }

    /// Profile for the session's account. Administrators and accounts with no
    /// local record get one built from the session itself.
    pub async fn profile(&self, session: &Session, reports_count: usize) -> UserProfileResponseDto {
        let reports_count = u32::try_from(reports_count).ok();

        if !session.is_admin() {
            if let Some(user) = self.find_by_email(&session.email).await {
                return UserProfileResponseDto {
                    id: user.id,
                    full_name: user.full_name,
                    email: user.email,
                    role: user.role,
                    created_at: user.created_at,
                    profile: UserActivity {
                        reports_count,
                        ..user.profile
                    },
                };
            }
        }

        let (id, created_at) = match &session.user {
            Some(summary) => (summary.id.clone(), summary.created_at),
            None => (session.role.to_string(), None),
        };

        UserProfileResponseDto {
            id,
            full_name: session.name.clone(),
            email: session.email.clone(),
            role: session.role,
            created_at,
            profile: UserActivity {
                joined: created_at,
                reports_count: (session.role == Role::User).then_some(reports_count).flatten(),
                last_active: Some(session.created_at),
            },
        }
    }

    pub async fn get_preferences(&self, email: &str) -> Preferences {
        let key = preferences_key(email);
        match self.store.load_document(&key).await {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable preferences for {}: {}", email, e);
                Preferences::default()
            }
        }
    }

    /// Merge `update` into the stored preferences and return the result
    pub async fn update_preferences(&self, email: &str, update: Preferences) -> Result<Preferences> {
        let key = preferences_key(email);
        let _guard = self.write_lock.lock().await;

        let mut prefs: Preferences = self.store.load_document(&key).await?.unwrap_or_default();
        prefs.merge(update);
        self.store.save_document(&key, &prefs).await?;

        Ok(prefs)
    }

    /// Apply `apply` to the user with `email`. `Ok(false)` when there is no
    /// such user; the collection is not rewritten in that case.
    async fn mutate<F>(&self, email: &str, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut User),
    {
        let _guard = self.write_lock.lock().await;
        let mut users: Vec<User> = self.store.load_collection(USERS_KEY).await?;

        let Some(user) = users.iter_mut().find(|u| u.email == email) else {
            return Ok(false);
        };
        apply(user);

        self.store.save_collection(USERS_KEY, &users).await?;
        Ok(true)
    }
}

fn preferences_key(email: &str) -> String {
    format!("{}{}", PREFERENCES_KEY_PREFIX, email)
}
