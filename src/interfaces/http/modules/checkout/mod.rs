//! Checkout module: PayPal create-order / capture-order

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
