//! Database entities module

pub mod booking;
pub mod checkout_order;

pub use booking::Entity as Booking;
pub use checkout_order::Entity as CheckoutOrder;
