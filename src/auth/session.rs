//! Signed-in session state, injected wherever it is read or written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::SessionError;

use super::model::{Tokens, User};

/// What clients may see of the session. Tokens are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// On-disk form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Where the session survives restarts of the host.
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionError>;
    async fn store(&self, session: &PersistedSession) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps the session as a JSON file.
pub struct JsonFileSessionPersistence {
    path: PathBuf,
}

impl JsonFileSessionPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SessionPersistence for JsonFileSessionPersistence {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn store(&self, session: &PersistedSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| self.io_error(e))
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    tokens: Option<Tokens>,
}

impl SessionState {
    fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.tokens.is_some()
    }
}

/// `{user, tokens, is_authenticated}` behind a lock, optionally persisted.
///
/// Persistence failures are logged; the in-memory state stays authoritative.
pub struct SessionStore {
    state: RwLock<SessionState>,
    persistence: Option<Arc<dyn SessionPersistence>>,
}

impl SessionStore {
    /// In-memory only.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(SessionState::default()),
            persistence: None,
        })
    }

    pub fn with_persistence(persistence: Arc<dyn SessionPersistence>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(SessionState::default()),
            persistence: Some(persistence),
        })
    }

    /// Load a previously persisted session. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool, SessionError> {
        let Some(persistence) = &self.persistence else {
            return Ok(false);
        };
        let Some(saved) = persistence.load().await? else {
            return Ok(false);
        };
        info!(user = %saved.user.email, "Restored persisted session");
        let mut state = self.state.write().await;
        state.tokens = Some(Tokens::new(saved.access_token, saved.refresh_token));
        state.user = Some(saved.user);
        Ok(true)
    }

    pub async fn set_auth(&self, user: User, tokens: Tokens) {
        let persisted = PersistedSession {
            user: user.clone(),
            access_token: tokens.access_token.expose_secret().to_string(),
            refresh_token: tokens.refresh_token.expose_secret().to_string(),
        };
        {
            let mut state = self.state.write().await;
            state.user = Some(user);
            state.tokens = Some(tokens);
        }
        info!(user = %persisted.user.email, "Session authenticated");
        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.store(&persisted).await
        {
            warn!(error = %e, "Failed to persist session");
        }
    }

    pub async fn clear_auth(&self) {
        {
            let mut state = self.state.write().await;
            *state = SessionState::default();
        }
        info!("Session cleared");
        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.clear().await
        {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            user: state.user.clone(),
            is_authenticated: state.is_authenticated(),
        }
    }

    /// Identifier the auth service uses to end this session.
    pub async fn session_id(&self) -> Option<SecretString> {
        let state = self.state.read().await;
        state
            .tokens
            .as_ref()
            .map(|t| SecretString::from(t.refresh_token.expose_secret().to_string()))
    }
}
