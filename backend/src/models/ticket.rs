//! Ticket entity, status codes, and the payloads accepted by the ticket API.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

use crate::types::TicketId;
use crate::utils::time::format_display_date;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    /// Email of the user the ticket is assigned to.
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Email of the creator. Written once on insert.
    pub created_by: String,
    /// Email of the last actor that changed the status.
    pub updated_by: Option<String>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn new(
        title: String,
        description: String,
        assignee: Option<String>,
        due_date: NaiveDate,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TicketId::new(),
            title,
            description,
            assignee,
            due_date: Some(due_date),
            created_by,
            updated_by: None,
            status: TicketStatus::Pending,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_created_by(&self, email: &str) -> bool {
        self.created_by == email
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assignee.as_deref() == Some(email)
    }
}

/// Workflow state of a ticket, stored as a SMALLINT code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[repr(i16)]
pub enum TicketStatus {
    #[default]
    Pending = 0,
    InProgress = 1,
    Completed = 2,
}

impl TicketStatus {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Completed => "completed",
        }
    }
}

impl TryFrom<i64> for TicketStatus {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TicketStatus::Pending),
            1 => Ok(TicketStatus::InProgress),
            2 => Ok(TicketStatus::Completed),
            other => Err(other),
        }
    }
}

impl Serialize for TicketStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i16(self.code())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        TicketStatus::try_from(code).map_err(|other| {
            serde::de::Error::custom(format!("unknown ticket status code {}", other))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_not_blank",
        message = "The title field is required."
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(
        min = 5,
        message = "The description must be at least 5 characters."
    ))]
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_due_date",
        message = "The due date is not a valid date."
    ))]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTicketRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_not_blank",
        message = "The title field is required."
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(
        min = 5,
        message = "The description must be at least 5 characters."
    ))]
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_due_date",
        message = "The due date is not a valid date."
    ))]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignTicketRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_not_blank",
        message = "The assignee field is required."
    ))]
    pub assignee: String,
    #[serde(default)]
    #[validate(custom(
        function = "crate::validation::rules::validate_due_date",
        message = "The due date is not a valid date."
    ))]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default = "missing_status_code")]
    #[validate(custom(
        function = "crate::validation::rules::validate_status_code",
        message = "The selected status is invalid."
    ))]
    pub status: i64,
}

fn missing_status_code() -> i64 {
    -1
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub assignee: Option<String>,
    /// `dd-mm-YYYY`, empty when the ticket has no due date.
    pub due_date: String,
    pub status: String,
    pub status_code: i16,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Tz>,
    pub updated_at: DateTime<Tz>,
}

impl TicketResponse {
    pub fn from_ticket(ticket: Ticket, tz: &Tz) -> Self {
        TicketResponse {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            assignee: ticket.assignee,
            due_date: ticket.due_date.map(format_display_date).unwrap_or_default(),
            status: ticket.status.label().to_string(),
            status_code: ticket.status.code(),
            created_by: ticket.created_by,
            updated_by: ticket.updated_by,
            created_at: ticket.created_at.with_timezone(tz),
            updated_at: ticket.updated_at.with_timezone(tz),
        }
    }
}
