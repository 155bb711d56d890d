//! Notifications domain layer: entities, message content, duplicate suppression

pub mod content;
pub mod dedup;
pub mod entities;
