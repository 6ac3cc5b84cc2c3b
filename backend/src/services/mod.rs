pub mod notification;
pub mod status_transition;
pub mod ticket;
pub mod ticket_policy;

pub use notification::NotificationService;
pub use ticket::TicketService;
