use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Session, SessionIdentity};
use crate::modules::storage::LocalStore;
use crate::shared::constants::SESSION_KEY_PREFIX;

/// Issues and resolves opaque bearer tokens backed by server-side records
pub struct SessionService {
    store: Arc<LocalStore>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<LocalStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn issue(&self, identity: SessionIdentity) -> Result<Session> {
        let token = Uuid::new_v4().simple().to_string();
        let session = Session::new(token, identity, self.ttl);

        self.store
            .save_document(&session_key(&session.token), &session)
            .await?;

        tracing::info!("Issued {} session for {}", session.role, session.email);
        Ok(session)
    }

    /// Look up the session behind `token`. Expired records are removed.
    pub async fn resolve(&self, token: &str) -> Result<Session> {
        let key = session_key(token);

        let session = match self.store.load_document::<Session>(&key).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(invalid_session()),
            Err(e) => {
                tracing::warn!("Discarding unreadable session record: {}", e);
                self.store.remove(&key).await?;
                return Err(invalid_session());
            }
        };

        if session.is_expired_at(Utc::now()) {
            tracing::debug!("Session for {} expired", session.email);
            self.store.remove(&key).await?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        Ok(session)
    }

    /// Remove the session record. Ending an unknown session is a no-op.
    pub async fn end(&self, session: &Session) -> Result<()> {
        self.store.remove(&session_key(&session.token)).await?;
        tracing::info!("Ended session for {}", session.email);
        Ok(())
    }
}

fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token)
}

fn invalid_session() -> AppError {
    AppError::Unauthorized("Invalid or expired session".to_string())
}
