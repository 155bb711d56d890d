//! Collaborator interfaces for the Notifications domain
//!
//! Storage lives outside the core. The store persists in-app notifications and
//! answers the duplicate query; the directory is the role index and contact
//! book used to resolve recipients.

pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use reelflow_common::{RepositoryError, Role};

use crate::domain::entities::{DedupKey, NewNotification, NotificationRecord};

/// In-app notification persistence
#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist one notification
    async fn record(&self, notification: NewNotification)
        -> Result<NotificationRecord, RepositoryError>;

    /// Whether a record matching `key` was created strictly after `since`
    async fn recent_exists(
        &self,
        key: &DedupKey,
        since: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// Persist several notifications in one call
    async fn record_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<NotificationRecord>, RepositoryError> {
        let mut records = Vec::with_capacity(notifications.len());
        for notification in notifications {
            records.push(self.record(notification).await?);
        }
        Ok(records)
    }
}

/// Contact details for a user, as far as notifications are concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub additional_emails: Vec<String>,
}

impl Contact {
    /// Primary address followed by additional ones, invalid addresses dropped
    pub fn all_emails(&self) -> Vec<String> {
        self.email
            .iter()
            .chain(self.additional_emails.iter())
            .map(|email| email.trim().to_string())
            .filter(|email| email.validate_email())
            .collect()
    }

    /// Primary address when it is valid
    pub fn primary_email(&self) -> Option<String> {
        self.email
            .as_ref()
            .map(|email| email.trim().to_string())
            .filter(|email| email.validate_email())
    }
}

/// Role index and contact book
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Ids of every user holding `role`
    async fn ids_with_role(&self, role: Role) -> Result<Vec<Uuid>, RepositoryError>;

    /// Contact details for one user
    async fn contact(&self, user_id: Uuid) -> Result<Option<Contact>, RepositoryError>;
}
