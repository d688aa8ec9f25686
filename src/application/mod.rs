pub mod checkout;

// Re-export key types for convenience
pub use checkout::{
    CartLine, CheckoutCoordinator, CheckoutInput, CheckoutOutcome, CheckoutSettings,
    CompleteCheckout, InitiatedCheckout,
};
