//! Domain layer: entities, value types and the ports the checkout flow uses.

pub mod booking;
pub mod checkout_order;
pub mod money;
pub mod payment;
pub mod repositories;

// Re-export commonly used types
pub use booking::{Booking, BookingRepository, NewBooking, PaymentInfo, PaymentStatus, ServiceType};
pub use checkout_order::{CheckoutOrder, CheckoutOrderRepository};
pub use money::ExchangeRate;
pub use payment::{ApprovalLink, CapturedOrder, CreatedOrder, OrderStatus, PaymentGateway};
pub use repositories::{DomainResult, RepositoryProvider};

pub use crate::shared::errors::CheckoutError;
