//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Sessions live server side in the SQLite store; the client only holds a
//! signed cookie with the session id.

use std::time::Duration;

use axum::{extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha512};
use tokio::task::JoinHandle;
use tower_sessions::{Session, cookie::Key, session_store::ExpiredDeletion};
use tower_sessions_sqlx_store::SqliteStore;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const USER_ID_KEY: &str = "user_id";
pub const SESSION_COOKIE: &str = "po_session";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Rotate the session id and bind it to the authenticated user.
    pub async fn persist_user(&self, user_id: Uuid) -> Result<()> {
        self.0.cycle_id().await?;
        self.0.insert(USER_ID_KEY, user_id.to_string()).await?;
        Ok(())
    }

    /// Fetch the current user id from the session, if present.
    pub async fn user_id(&self) -> Result<Option<Uuid>> {
        let Some(raw) = self.0.get::<String>(USER_ID_KEY).await? else {
            return Ok(None);
        };
        match Uuid::parse_str(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                tracing::warn!("invalid user id in session: {error}");
                Ok(None)
            }
        }
    }

    /// Delete the stored session and expire the cookie.
    pub async fn clear(&self) -> Result<()> {
        self.0.flush().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Internal(message.to_string()))?;
        Ok(Self::new(session))
    }
}

/// Derives the 64-byte cookie signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Periodically removes expired sessions from the store.
pub fn spawn_expired_session_cleanup(store: SqliteStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(error) = store.delete_expired().await {
                tracing::warn!(%error, "failed to delete expired sessions");
            }
        }
    })
}
