//! Payment provider port
//!
//! Normalized order shapes and the gateway trait the checkout flow calls.

pub mod gateway;
pub mod model;

pub use gateway::PaymentGateway;
pub use model::{ApprovalLink, CapturedOrder, CreatedOrder, OrderStatus};
