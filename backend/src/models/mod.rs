//! Data models shared across database access and API handlers.

pub mod notification;
pub mod ticket;
pub mod ticket_log;
pub mod user;
