//! These models represent the objects exchanged with the completion endpoint
//!
//! A conversation is an ordered list of role-tagged messages. The order is the
//! chronological turn order and is sent to the model exactly as stored.
pub mod message;
pub mod request;
