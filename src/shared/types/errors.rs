use thiserror::Error;

/// Every failure the checkout flow can produce.
///
/// Variants fall into four groups:
/// - client input defects (`InvalidAmount`, `InvalidCart`, `MissingField`,
///   `Validation`, `InvalidOrderId`, `OrderNotBound`), never retried without
///   correction;
/// - upstream provider failures (`Credentials`, `OrderCreation`,
///   `OrderCapture`), retryable by the client, never retried internally;
/// - `DuplicateBooking`, the idempotency signal: the slot is already booked
///   and the payment already reconciled;
/// - storage failures (`Storage`, `BookingNotRecorded`).
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid cart: {0}")]
    InvalidCart(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid provider order id")]
    InvalidOrderId,

    #[error("Order {0} does not belong to this checkout")]
    OrderNotBound(String),

    #[error("Provider credentials error (status {status:?}): {body}")]
    Credentials { status: Option<u16>, body: String },

    #[error("Provider order creation failed (status {status:?}): {body}")]
    OrderCreation { status: Option<u16>, body: String },

    #[error("Provider order capture failed (status {status:?}): {body}")]
    OrderCapture { status: Option<u16>, body: String },

    #[error("A booking already exists for this user, time slot, service and duration")]
    DuplicateBooking,

    #[error("Order {order_id} was captured (capture {capture_id:?}) but the booking was not recorded: {reason}")]
    BookingNotRecorded {
        order_id: String,
        capture_id: Option<String>,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CheckoutError {
    /// Stable machine-readable code, sent to clients next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidCart(_) => "INVALID_CART",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidOrderId => "INVALID_ORDER_ID",
            Self::OrderNotBound(_) => "ORDER_NOT_FOUND",
            Self::Credentials { .. } => "PROVIDER_CREDENTIALS_ERROR",
            Self::OrderCreation { .. } => "ORDER_CREATION_ERROR",
            Self::OrderCapture { .. } => "ORDER_CAPTURE_ERROR",
            Self::DuplicateBooking => "DUPLICATE_BOOKING",
            Self::BookingNotRecorded { .. } => "BOOKING_NOT_RECORDED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the client may resubmit the same request unchanged.
    ///
    /// Provider failures are retryable: capture is idempotent per order id.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Credentials { .. } | Self::OrderCreation { .. } | Self::OrderCapture { .. }
        )
    }

    /// Whether the error was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidCart(_)
                | Self::MissingField(_)
                | Self::Validation(_)
                | Self::InvalidOrderId
                | Self::OrderNotBound(_)
        )
    }
}

/// Result type for checkout and ledger operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_are_retryable() {
        let err = CheckoutError::OrderCapture {
            status: Some(503),
            body: "unavailable".into(),
        };
        assert!(err.is_retryable());
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "ORDER_CAPTURE_ERROR");
    }

    #[test]
    fn input_defects_are_not_retryable() {
        let err = CheckoutError::MissingField("order_id");
        assert!(!err.is_retryable());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Missing required field: order_id");
    }

    #[test]
    fn duplicate_is_neither_client_nor_retryable() {
        let err = CheckoutError::DuplicateBooking;
        assert!(!err.is_retryable());
        assert!(!err.is_client_error());
    }
}
