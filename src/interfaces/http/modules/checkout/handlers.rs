//! Checkout handlers: open a provider order, then capture it and book

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{
    CaptureOrderRequest, CaptureOrderResponse, CreateOrderRequest, CreateOrderResponse,
    PaymentNotCompletedDto,
};
use crate::application::{CheckoutCoordinator, CheckoutOutcome};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::bookings::BookingDto;

#[derive(Clone)]
pub struct CheckoutAppState {
    pub coordinator: Arc<CheckoutCoordinator>,
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/create-order",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Provider order opened, awaiting payer approval", body = ApiResponse<CreateOrderResponse>),
        (status = 400, description = "Invalid cart or amount"),
        (status = 401, description = "Missing or invalid token"),
        (status = 502, description = "Payment provider failure")
    )
)]
pub async fn create_order(
    State(state): State<CheckoutAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateOrderResponse>>), ApiError> {
    let input = req.checkout_input()?;
    let initiated = state
        .coordinator
        .initiate_checkout(&user.user_id, input, req.description.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(initiated.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/capture-order",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    request_body = CaptureOrderRequest,
    responses(
        (status = 201, description = "Payment captured and booking recorded", body = ApiResponse<CaptureOrderResponse>),
        (status = 400, description = "Missing or malformed field"),
        (status = 404, description = "Order was not opened by this user"),
        (status = 409, description = "Slot or order already booked"),
        (status = 422, description = "Provider did not complete the payment", body = ApiResponse<PaymentNotCompletedDto>),
        (status = 502, description = "Payment provider failure"),
        (status = 500, description = "Payment captured but booking not recorded")
    )
)]
pub async fn capture_order(
    State(state): State<CheckoutAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CaptureOrderRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .coordinator
        .complete_checkout(&user.user_id, req.into())
        .await?;

    let response = match outcome {
        CheckoutOutcome::Booked { booking, capture } => (
            StatusCode::CREATED,
            Json(ApiResponse::success(CaptureOrderResponse {
                booking: BookingDto::from(booking),
                capture_id: capture.capture_id,
                provider: capture.raw,
            })),
        )
            .into_response(),
        CheckoutOutcome::NotCompleted {
            order_id,
            status,
            raw,
        } => {
            let message = format!("Payment not completed (status {})", status);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::failure(
                    PaymentNotCompletedDto {
                        order_id,
                        status: status.as_str().to_string(),
                        provider: raw,
                    },
                    "PAYMENT_NOT_COMPLETED",
                    message,
                )),
            )
                .into_response()
        }
    };

    Ok(response)
}
