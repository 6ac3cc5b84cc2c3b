pub mod notification;
pub mod ticket;
pub mod ticket_log;
pub mod transaction;
pub mod user;

pub use notification::NotificationRepository;
pub use ticket::TicketRepository;
pub use transaction::*;
pub use user::{UserRepository, UserRepositoryTrait};

#[cfg(test)]
pub use user::MockUserRepositoryTrait;
