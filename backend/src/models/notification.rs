use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{NotificationId, TicketId};
use crate::utils::time::format_display_datetime;

/// Action tag stored on notifications produced by a ticket assignment.
pub const ASSIGN_ACTION: &str = "Asign";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub action: String,
    pub link_url: String,
    /// Email of the user the notification is addressed to.
    pub recipient: String,
    pub status_read: bool,
    pub read_on: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Builds the notification sent to `recipient` when `actor_name` assigns them a ticket.
    pub fn assignment(
        ticket_id: TicketId,
        ticket_title: &str,
        recipient: String,
        actor_name: &str,
        actor_email: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: NotificationId::new(),
            message: format!("{} has assigned you to ticket: {}", actor_name, ticket_title),
            action: ASSIGN_ACTION.to_string(),
            link_url: ticket_link(ticket_id),
            recipient,
            status_read: false,
            read_on: None,
            created_by: actor_email,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

pub fn ticket_link(ticket_id: TicketId) -> String {
    format!("/ticket/{}", ticket_id)
}

/// Notification as shown to its recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub message: String,
    pub action: String,
    pub link_url: String,
    /// "Read" or "Not Read".
    pub status_read: String,
    /// `dd-mm-YYYY` of the latest view, empty when never read.
    pub read_on: String,
}

impl NotificationResponse {
    pub fn from_notification(notification: &Notification, tz: &Tz) -> Self {
        NotificationResponse {
            id: notification.id,
            message: notification.message.clone(),
            action: notification.action.clone(),
            link_url: notification.link_url.clone(),
            status_read: read_label(notification.status_read).to_string(),
            read_on: notification
                .read_on
                .map(|read_on| format_display_datetime(read_on, tz))
                .unwrap_or_default(),
        }
    }
}

pub fn read_label(status_read: bool) -> &'static str {
    if status_read {
        "Read"
    } else {
        "Not Read"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn assignment_notification_targets_recipient_and_links_ticket() {
        let ticket_id = TicketId::new();
        let notification = Notification::assignment(
            ticket_id,
            "Bug Report",
            "b@x.com".into(),
            "Ada",
            "a@x.com".into(),
        );
        assert_eq!(notification.recipient, "b@x.com");
        assert_eq!(notification.action, "Asign");
        assert_eq!(notification.link_url, format!("/ticket/{}", ticket_id));
        assert!(notification.message.contains("Ada"));
        assert!(notification.message.contains("Bug Report"));
        assert!(!notification.status_read);
        assert!(notification.read_on.is_none());
    }

    #[test]
    fn response_labels_read_state_and_formats_read_date() {
        let mut notification = Notification::assignment(
            TicketId::new(),
            "Bug Report",
            "b@x.com".into(),
            "Ada",
            "a@x.com".into(),
        );
        let unread = NotificationResponse::from_notification(&notification, &chrono_tz::UTC);
        assert_eq!(unread.status_read, "Not Read");
        assert_eq!(unread.read_on, "");

        notification.status_read = true;
        notification.read_on = Some(Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap());
        let read = NotificationResponse::from_notification(&notification, &chrono_tz::UTC);
        assert_eq!(read.status_read, "Read");
        assert_eq!(read.read_on, "03-02-2025");
    }
}
