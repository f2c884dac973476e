//! Toast notifications.
//!
//! A toast is pushed into the session by an action and taken (removed) by
//! the next page render. Delivery is fire-and-forget: failures are logged
//! and the notification is dropped.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// A one-shot success message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Queue this toast for the next page render.
    pub async fn push(self, session: &Session) {
        if let Err(e) = session.insert(session_keys::TOAST, self).await {
            tracing::warn!(error = %e, "Failed to queue toast");
        }
    }

    /// Take the queued toast, if any.
    pub async fn take(session: &Session) -> Option<Self> {
        session
            .remove::<Self>(session_keys::TOAST)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to read toast"))
            .ok()
            .flatten()
    }
}
