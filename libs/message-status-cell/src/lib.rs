//! Delivery and read tracking for consultation chat messages.
//!
//! A message moves `Sent -> Delivered -> Read`, driven only by
//! acknowledgements the host receives from its transport layer. The tracker
//! never emits notifications of its own.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

pub use error::*;
pub use models::*;
pub use services::*;
pub use router::message_status_routes;
pub use state::MessageCellState;
