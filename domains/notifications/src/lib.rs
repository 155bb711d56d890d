//! Notifications domain: intents, duplicate suppression, dispatch

pub mod dispatcher;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use domain::dedup::NotificationDeduplicator;
pub use domain::entities::{
    DedupKey, DispatchPlan, MailDirective, NewNotification, NotificationIntent,
    NotificationRecord, NotificationType, Recipient,
};
pub use repository::memory::{InMemoryNotificationStore, InMemoryUserDirectory};
pub use repository::{Contact, NotificationStore, UserDirectory};
