//! Payment-authorized booking checkout

pub mod coordinator;
pub mod input;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{CheckoutCoordinator, CheckoutSettings};
pub use input::{CartLine, CheckoutInput, CheckoutOutcome, CompleteCheckout, InitiatedCheckout};
