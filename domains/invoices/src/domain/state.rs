//! Invoice state machine
//!
//! ```text
//! pending --send--> sent --mark_paid--> paid
//!    |               |  ^
//!    |               |  '--send (resend)
//!    '----cancel-----'--cancel--> cancelled
//! ```
//!
//! `paid` and `cancelled` are terminal.

use reelflow_common::StateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceState {
    Pending,
    Sent,
    Paid,
    Cancelled,
}

impl InvoiceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [InvoiceState] {
        match self {
            Self::Pending => &[Self::Sent, Self::Cancelled],
            Self::Sent => &[Self::Sent, Self::Paid, Self::Cancelled],
            Self::Paid => &[],
            Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Sent => write!(f, "sent"),
            Self::Paid => write!(f, "paid"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceEvent {
    /// Invoice emailed to the client
    Send,
    /// Payment received
    MarkPaid,
    Cancel,
}

impl std::fmt::Display for InvoiceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Send => write!(f, "send"),
            Self::MarkPaid => write!(f, "mark_paid"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

pub struct InvoiceStateMachine;

impl InvoiceStateMachine {
    /// Attempt a state transition
    pub fn transition(current: InvoiceState, event: InvoiceEvent) -> Result<InvoiceState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (InvoiceState::Pending | InvoiceState::Sent, InvoiceEvent::Send) => InvoiceState::Sent,
            (InvoiceState::Sent, InvoiceEvent::MarkPaid) => InvoiceState::Paid,
            (InvoiceState::Pending | InvoiceState::Sent, InvoiceEvent::Cancel) => {
                InvoiceState::Cancelled
            }
            _ => return Err(StateError::invalid(current, event)),
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: InvoiceState, event: InvoiceEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let sent = InvoiceStateMachine::transition(InvoiceState::Pending, InvoiceEvent::Send).unwrap();
        assert_eq!(sent, InvoiceState::Sent);
        let resent = InvoiceStateMachine::transition(sent, InvoiceEvent::Send).unwrap();
        assert_eq!(resent, InvoiceState::Sent);
        assert_eq!(
            InvoiceStateMachine::transition(resent, InvoiceEvent::MarkPaid).unwrap(),
            InvoiceState::Paid
        );
    }

    #[test]
    fn test_cannot_pay_a_pending_invoice() {
        let err = InvoiceStateMachine::transition(InvoiceState::Pending, InvoiceEvent::MarkPaid)
            .unwrap_err();
        assert_eq!(err, StateError::invalid("pending", "mark_paid"));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for state in [InvoiceState::Paid, InvoiceState::Cancelled] {
            assert!(state.valid_transitions().is_empty());
            for event in [InvoiceEvent::Send, InvoiceEvent::MarkPaid, InvoiceEvent::Cancel] {
                assert!(matches!(
                    InvoiceStateMachine::transition(state, event),
                    Err(StateError::TerminalState(_))
                ));
            }
        }
    }

    #[test]
    fn test_valid_transitions_agree_with_machine() {
        let events = [InvoiceEvent::Send, InvoiceEvent::MarkPaid, InvoiceEvent::Cancel];
        for state in [InvoiceState::Pending, InvoiceState::Sent] {
            let mut reachable: Vec<InvoiceState> = events
                .iter()
                .filter_map(|e| InvoiceStateMachine::transition(state, *e).ok())
                .collect();
            reachable.dedup();
            assert_eq!(reachable, state.valid_transitions());
        }
        assert!(InvoiceStateMachine::can_transition(InvoiceState::Pending, InvoiceEvent::Cancel));
    }
}
