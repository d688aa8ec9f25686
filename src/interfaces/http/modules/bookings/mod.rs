//! Bookings module: the caller's confirmed walks

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
