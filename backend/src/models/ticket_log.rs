use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{TicketId, TicketLogId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketLog {
    pub id: TicketLogId,
    pub ticket_id: TicketId,
    pub action: String,
    pub description: String,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketLogAction {
    AddTicket,
    UpdateTicket,
    DeleteTicket,
    AsignTicket,
    StatusUpdated,
}

impl TicketLogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketLogAction::AddTicket => "add_ticket",
            TicketLogAction::UpdateTicket => "update_ticket",
            TicketLogAction::DeleteTicket => "delete_ticket",
            TicketLogAction::AsignTicket => "asign_ticket",
            TicketLogAction::StatusUpdated => "status_updated",
        }
    }
}

impl TicketLog {
    pub fn new(
        ticket_id: TicketId,
        action: TicketLogAction,
        description: String,
        performed_by: String,
    ) -> Self {
        Self {
            id: TicketLogId::new(),
            ticket_id,
            action: action.as_str().to_string(),
            description,
            performed_by,
            created_at: Utc::now(),
        }
    }
}
