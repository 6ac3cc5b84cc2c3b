pub mod extract;
pub mod notifications;
pub mod response;
pub mod tickets;
pub mod users;

pub use extract::JsonBody;
pub use response::ApiResponse;
