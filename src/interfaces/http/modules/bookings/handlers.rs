//! Booking listing handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::dto::BookingDto;
use crate::application::CheckoutCoordinator;
use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::validate_pagination;

#[derive(Clone)]
pub struct BookingsAppState {
    pub coordinator: Arc<CheckoutCoordinator>,
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Bookings of the caller, newest first", body = ApiResponse<PaginatedResponse<BookingDto>>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_my_bookings(
    State(state): State<BookingsAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingDto>>>, ApiError> {
    let (page, limit) = validate_pagination(params.page, params.limit);
    let bookings = state
        .coordinator
        .bookings_for_user(&user.user_id, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(bookings.into())))
}
