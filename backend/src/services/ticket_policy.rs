//! Who may do what to a ticket.

use crate::error::AppError;
use crate::models::{ticket::Ticket, user::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Edit,
    Delete,
    Assign,
    ChangeStatus,
}

impl TicketAction {
    fn denial_message(self) -> &'static str {
        match self {
            TicketAction::Edit | TicketAction::Assign => "You are not allowed to edit this ticket.",
            TicketAction::Delete => "You are not allowed to delete this ticket.",
            TicketAction::ChangeStatus => "You are not allowed to update this ticket.",
        }
    }
}

/// Edit, delete, and assign are reserved for the creator.
pub fn can_mutate(ticket: &Ticket, actor: &User) -> bool {
    ticket.is_created_by(&actor.email)
}

/// Status changes are open to the creator and the current assignee.
pub fn can_transition(ticket: &Ticket, actor: &User) -> bool {
    ticket.is_created_by(&actor.email) || ticket.is_assigned_to(&actor.email)
}

/// Reading a single ticket follows the same parties as status changes.
pub fn can_view(ticket: &Ticket, actor: &User) -> bool {
    can_transition(ticket, actor)
}

pub fn ensure_permitted(ticket: &Ticket, actor: &User, action: TicketAction) -> Result<(), AppError> {
    let permitted = match action {
        TicketAction::Edit | TicketAction::Delete | TicketAction::Assign => {
            can_mutate(ticket, actor)
        }
        TicketAction::ChangeStatus => can_transition(ticket, actor),
    };

    if permitted {
        Ok(())
    } else {
        tracing::warn!(
            ticket_id = %ticket.id,
            actor = %actor.email,
            action = ?action,
            "ticket action denied"
        );
        Err(AppError::Forbidden(action.denial_message().to_string()))
    }
}
