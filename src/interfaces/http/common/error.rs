//! Mapping of checkout failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn, Level};

use super::ApiResponse;
use crate::shared::errors::CheckoutError;

/// Handler error wrapper; every `CheckoutError` converts with `?`.
#[derive(Debug)]
pub struct ApiError(pub CheckoutError);

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CheckoutError::InvalidAmount(_)
            | CheckoutError::InvalidCart(_)
            | CheckoutError::MissingField(_)
            | CheckoutError::Validation(_)
            | CheckoutError::InvalidOrderId => StatusCode::BAD_REQUEST,
            CheckoutError::OrderNotBound(_) => StatusCode::NOT_FOUND,
            CheckoutError::DuplicateBooking => StatusCode::CONFLICT,
            CheckoutError::Credentials { .. }
            | CheckoutError::OrderCreation { .. }
            | CheckoutError::OrderCapture { .. } => StatusCode::BAD_GATEWAY,
            CheckoutError::BookingNotRecorded { .. } | CheckoutError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Provider bodies and storage details stay
    /// in the logs.
    fn public_message(&self) -> String {
        match &self.0 {
            CheckoutError::Credentials { .. } => {
                "Payment provider authentication failed".to_string()
            }
            CheckoutError::OrderCreation { .. } => {
                "Payment provider could not create the order".to_string()
            }
            CheckoutError::OrderCapture { .. } => {
                "Payment provider could not capture the order".to_string()
            }
            CheckoutError::BookingNotRecorded { order_id, .. } => format!(
                "Payment for order {} was captured but the booking could not be saved",
                order_id
            ),
            CheckoutError::Storage(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Provider failures are expected upstream noise; other 5xx are ours.
fn log_level(status: StatusCode) -> Option<Level> {
    if status == StatusCode::BAD_GATEWAY {
        Some(Level::WARN)
    } else if status.is_server_error() {
        Some(Level::ERROR)
    } else {
        None
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match log_level(status) {
            Some(Level::WARN) => {
                warn!(code = self.0.code(), error = %self.0, "Payment provider call failed")
            }
            Some(_) => error!(code = self.0.code(), error = %self.0, "Request failed"),
            None => {}
        }

        let body = ApiResponse::<()>::error_with_code(self.0.code(), self.public_message());
        (status, Json(body)).into_response()
    }
}
