//! Validation rules for ticket and notification payloads.
//!
//! Payload structs derive `validator::Validate` and point their custom checks
//! at the functions in [`rules`].

pub mod rules;

pub use validator::Validate;
