//! Shared utilities, configuration, and error handling for Reelflow
//!
//! This crate provides common functionality used across the Reelflow workspace:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - User roles shared by every domain

pub mod config;
pub mod db;
pub mod error;
pub mod role;
pub mod state;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use role::Role;
pub use state::StateError;
