//! Duplicate suppression for in-app notifications
//!
//! A notification is suppressed when a record with the same
//! (recipient, type, project, status) tuple was created inside the trailing
//! window. The check reads then decides; two concurrent requests can both pass
//! before either writes, and that occasional duplicate is accepted.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use reelflow_common::config::DEFAULT_DEDUP_WINDOW_SECS;

use crate::domain::entities::DedupKey;
use crate::repository::NotificationStore;

#[derive(Clone)]
pub struct NotificationDeduplicator {
    store: Arc<dyn NotificationStore>,
    window: Duration,
}

impl NotificationDeduplicator {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self::with_window(store, Duration::seconds(DEFAULT_DEDUP_WINDOW_SECS))
    }

    pub fn with_window(store: Arc<dyn NotificationStore>, window: Duration) -> Self {
        Self { store, window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a notification for `key` may be sent at `now`
    ///
    /// A failed lookup counts as "not a duplicate".
    pub async fn should_send(&self, key: &DedupKey, now: DateTime<Utc>) -> bool {
        let since = now - self.window;
        match self.store.recent_exists(key, since).await {
            Ok(exists) => {
                if exists {
                    tracing::debug!(
                        recipient_id = %key.recipient_id,
                        kind = %key.kind,
                        project_id = %key.project_id,
                        status = ?key.status,
                        "Suppressing duplicate notification"
                    );
                }
                !exists
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    recipient_id = %key.recipient_id,
                    kind = %key.kind,
                    project_id = %key.project_id,
                    "Duplicate lookup failed, sending anyway"
                );
                true
            }
        }
    }
}
