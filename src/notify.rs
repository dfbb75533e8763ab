//! Toast queue: transient user-facing notices, drained by the client.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Oldest toasts are dropped beyond this many undrained ones.
const MAX_PENDING: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Pending toasts until a client drains them.
pub struct ToastQueue {
    toasts: RwLock<VecDeque<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            toasts: RwLock::new(VecDeque::new()),
        })
    }

    pub async fn push(&self, level: ToastLevel, message: impl Into<String>) -> Toast {
        let toast = Toast::new(level, message);
        info!(level = ?toast.level, text = %toast.message, "Toast raised");
        let mut toasts = self.toasts.write().await;
        toasts.push_back(toast.clone());
        while toasts.len() > MAX_PENDING {
            if let Some(dropped) = toasts.pop_front() {
                debug!(toast_id = %dropped.id, "Dropping undrained toast");
            }
        }
        toast
    }

    pub async fn success(&self, message: impl Into<String>) -> Toast {
        self.push(ToastLevel::Success, message).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> Toast {
        self.push(ToastLevel::Warning, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Toast {
        self.push(ToastLevel::Error, message).await
    }

    /// Take every pending toast, oldest first.
    pub async fn drain(&self) -> Vec<Toast> {
        self.toasts.write().await.drain(..).collect()
    }

    pub async fn pending(&self) -> Vec<Toast> {
        self.toasts.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.toasts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.toasts.read().await.is_empty()
    }
}
