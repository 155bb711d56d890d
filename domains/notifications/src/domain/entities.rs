//! Domain entities for the Notifications domain
//!
//! An intent is a pending decision ("tell these people about this project"),
//! produced by the workflow policies before duplicate suppression and dispatch.
//! A record is what the notification store persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelflow_common::Role;

use crate::domain::content;

/// Notification type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Status change seen by admins and editors
    ProjectStatusUpdate,
    /// In-app notice to the client that output is ready
    SentToClient,
    /// Editor has been (re)assigned to a project
    ProjectAssigned,
    /// A client placed a new order
    ProjectCreated,
    /// Someone commented on a project
    ClientComment,
}

impl NotificationType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ProjectStatusUpdate => "project_status_update",
            Self::SentToClient => "client_project_status",
            Self::ProjectAssigned => "project_assigned",
            Self::ProjectCreated => "project_created",
            Self::ClientComment => "client_comment",
        }
    }

    /// Whether repeats within the window are suppressed
    ///
    /// Every comment is new content, so comment notices always go out.
    pub fn is_deduplicated(&self) -> bool {
        !matches!(self, Self::ClientComment)
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Who an intent is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Recipient {
    /// A single user
    User(Uuid),
    /// Everyone holding a role, resolved through the role index at dispatch
    Role(Role),
}

/// A notification decision prior to duplicate suppression and dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub recipient: Recipient,
    pub kind: NotificationType,
    pub project_id: Uuid,
    pub project_name: String,
    pub status: Option<String>,
    pub triggered_by: Role,
    pub message: String,
}

impl NotificationIntent {
    /// Status change notice for admins/editors
    pub fn status_update(
        recipient: Recipient,
        project_id: Uuid,
        project_name: &str,
        status: &str,
        triggered_by: Role,
    ) -> Self {
        Self {
            recipient,
            kind: NotificationType::ProjectStatusUpdate,
            project_id,
            project_name: project_name.to_string(),
            status: Some(status.to_string()),
            triggered_by,
            message: content::status_update_message(project_name, status, triggered_by),
        }
    }

    /// In-app "your project is ready" notice for the client
    pub fn sent_to_client(
        client_id: Uuid,
        project_id: Uuid,
        project_name: &str,
        status: &str,
        triggered_by: Role,
    ) -> Self {
        Self {
            recipient: Recipient::User(client_id),
            kind: NotificationType::SentToClient,
            project_id,
            project_name: project_name.to_string(),
            status: Some(status.to_string()),
            triggered_by,
            message: content::client_status_message(project_name, status),
        }
    }

    /// Assignment notice for an editor
    pub fn assigned(
        editor_id: Uuid,
        project_id: Uuid,
        project_name: &str,
        triggered_by: Role,
    ) -> Self {
        Self {
            recipient: Recipient::User(editor_id),
            kind: NotificationType::ProjectAssigned,
            project_id,
            project_name: project_name.to_string(),
            status: None,
            triggered_by,
            message: content::assigned_message(project_name),
        }
    }

    /// New order notice
    pub fn created(
        recipient: Recipient,
        project_id: Uuid,
        project_name: &str,
        triggered_by: Role,
    ) -> Self {
        Self {
            recipient,
            kind: NotificationType::ProjectCreated,
            project_id,
            project_name: project_name.to_string(),
            status: None,
            triggered_by,
            message: content::created_message(project_name),
        }
    }

    /// Comment notice
    pub fn comment(
        recipient: Recipient,
        project_id: Uuid,
        project_name: &str,
        triggered_by: Role,
    ) -> Self {
        Self {
            recipient,
            kind: NotificationType::ClientComment,
            project_id,
            project_name: project_name.to_string(),
            status: None,
            triggered_by,
            message: content::comment_message(project_name, triggered_by),
        }
    }

    /// Dedup key once the recipient has been resolved to a user
    pub fn key_for(&self, recipient_id: Uuid) -> DedupKey {
        DedupKey {
            recipient_id,
            kind: self.kind,
            project_id: self.project_id,
            status: self.status.clone(),
        }
    }

    /// JSON payload persisted with the record
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "project_id": self.project_id,
            "project_name": self.project_name,
            "message": self.message,
            "status": self.status,
            "type": self.kind.tag(),
            "triggered_by": self.triggered_by,
        })
    }
}

/// The tuple duplicate suppression matches on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub recipient_id: Uuid,
    pub kind: NotificationType,
    pub project_id: Uuid,
    pub status: Option<String>,
}

/// Mail side effects decided by a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MailDirective {
    /// Tell the client their output is ready
    ProjectDelivered {
        project_id: Uuid,
        client_id: Uuid,
        project_name: String,
        output_links: Vec<String>,
    },
}

/// Everything a policy decided for one change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchPlan {
    pub notifications: Vec<NotificationIntent>,
    pub mail: Vec<MailDirective>,
}

impl DispatchPlan {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.mail.is_empty()
    }

    pub fn push(&mut self, intent: NotificationIntent) {
        self.notifications.push(intent);
    }

    pub fn push_mail(&mut self, directive: MailDirective) {
        self.mail.push(directive);
    }

    /// Append another plan's decisions after this one's
    pub fn merge(mut self, other: DispatchPlan) -> Self {
        self.notifications.extend(other.notifications);
        self.mail.extend(other.mail);
        self
    }
}

/// Notification ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub kind: NotificationType,
    pub project_id: Uuid,
    pub status: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    pub fn from_intent(intent: &NotificationIntent, recipient_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            recipient_id,
            kind: intent.kind,
            project_id: intent.project_id,
            status: intent.status.clone(),
            payload: intent.payload(),
            created_at: now,
        }
    }
}

/// Persisted in-app notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationType,
    pub project_id: Uuid,
    pub status: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    pub fn from_new(new: NewNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            kind: new.kind,
            project_id: new.project_id,
            status: new.status,
            payload: new.payload,
            created_at: new.created_at,
            read_at: None,
        }
    }

    /// Whether this record matches a dedup key exactly
    pub fn matches(&self, key: &DedupKey) -> bool {
        self.recipient_id == key.recipient_id
            && self.kind == key.kind
            && self.project_id == key.project_id
            && self.status == key.status
    }

    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}
