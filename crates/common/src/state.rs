//! Common state machine error types
//!
//! Shared by domain crates whose entities follow a guarded life cycle
//! (invoices today).

use thiserror::Error;

use crate::error::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot {event} from {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl StateError {
    pub fn invalid(from: impl ToString, event: impl ToString) -> Self {
        StateError::InvalidTransition {
            from: from.to_string(),
            event: event.to_string(),
        }
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        Error::Validation(err.to_string())
    }
}
