//! Ticket status workflow.
//!
//! The graph is fixed: `Pending -> InProgress -> Completed`. Completed is
//! terminal and no state may transition to itself.

use thiserror::Error;

use crate::error::AppError;
use crate::models::ticket::TicketStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("status cannot move from {} to {}", .from.label(), .to.label())]
pub struct TransitionError {
    pub from: TicketStatus,
    pub to: TicketStatus,
}

/// The single state reachable from `from`, if any.
pub fn allowed_next(from: TicketStatus) -> Option<TicketStatus> {
    match from {
        TicketStatus::Pending => Some(TicketStatus::InProgress),
        TicketStatus::InProgress => Some(TicketStatus::Completed),
        TicketStatus::Completed => None,
    }
}

pub fn validate_transition(from: TicketStatus, to: TicketStatus) -> Result<(), TransitionError> {
    if allowed_next(from) == Some(to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}
