//! In-memory collaborators
//!
//! Used by tests and local development in place of a real database. Both
//! types are cheap to clone and share their state between clones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use reelflow_common::{RepositoryError, Role};

use crate::domain::entities::{DedupKey, NewNotification, NotificationRecord, NotificationType};
use crate::repository::{Contact, NotificationStore, UserDirectory};

/// Notification store backed by a vector
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
    query_failing: Arc<AtomicBool>,
    write_failing: Arc<AtomicBool>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the duplicate query fail
    pub fn set_query_failing(&self, failing: bool) {
        self.query_failing.store(failing, Ordering::SeqCst);
    }

    /// Make writes fail
    pub fn set_write_failing(&self, failing: bool) {
        self.write_failing.store(failing, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn for_recipient(&self, recipient_id: Uuid) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.recipient_id == recipient_id)
            .cloned()
            .collect()
    }

    pub fn count_of(&self, kind: NotificationType) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

#[async_trait::async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn record(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, RepositoryError> {
        if self.write_failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "notification store offline".to_string(),
            ));
        }

        let record = NotificationRecord::from_new(notification);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn recent_exists(
        &self,
        key: &DedupKey,
        since: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        if self.query_failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "notification store offline".to_string(),
            ));
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.matches(key) && r.created_at > since))
    }
}

/// User directory backed by a map
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<Mutex<HashMap<Uuid, Contact>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, contact: Contact) {
        self.users.lock().unwrap().insert(contact.id, contact);
    }

    /// Register a user with a single address and return its id
    pub fn add_user(&self, name: &str, role: Role, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.insert(Contact {
            id,
            name: name.to_string(),
            role,
            email: Some(email.to_string()),
            additional_emails: Vec::new(),
        });
        id
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn ids_with_role(&self, role: Role) -> Result<Vec<Uuid>, RepositoryError> {
        let mut ids: Vec<Uuid> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.role == role)
            .map(|c| c.id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn contact(&self, user_id: Uuid) -> Result<Option<Contact>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}
