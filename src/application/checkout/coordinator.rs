//! Two-phase checkout: reserve a provider order, then capture it and book.
//!
//! ```text
//! NO_ORDER ──initiate──▶ ORDER_CREATED ──complete──▶ capture
//!                                                     ├─ COMPLETED ─▶ BOOKED
//!                                                     │               └─ slot taken ─▶ DUPLICATE
//!                                                     └─ other ─────▶ NOT_COMPLETED (retryable)
//! ```
//!
//! No session state is kept between the phases beyond the checkout order
//! record. A booking is written only after the provider reports COMPLETED,
//! and duplicate captures are stopped by the ledger's unique indexes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::input::{CheckoutInput, CheckoutOutcome, CompleteCheckout, InitiatedCheckout};
use crate::domain::booking::{Booking, NewBooking, PaymentInfo, PaymentStatus};
use crate::domain::checkout_order::CheckoutOrder;
use crate::domain::payment::PaymentGateway;
use crate::domain::RepositoryProvider;
use crate::shared::errors::{CheckoutError, CheckoutResult};
use crate::shared::PaginatedResult;

const ORDERS_CREATED: &str = "checkout_orders_created_total";
const CAPTURES: &str = "checkout_captures_total";

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Refuse captures of orders not opened by the same user
    pub bind_orders: bool,
    /// Used when the client sends no description
    pub default_description: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            bind_orders: true,
            default_description: "Paseo Amigo".to_string(),
        }
    }
}

pub struct CheckoutCoordinator {
    gateway: Arc<dyn PaymentGateway>,
    repos: Arc<dyn RepositoryProvider>,
    settings: CheckoutSettings,
}

impl CheckoutCoordinator {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        repos: Arc<dyn RepositoryProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            gateway,
            repos,
            settings,
        }
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Phase A: validate the cart, open a provider order and remember who
    /// opened it. Nothing is charged.
    pub async fn initiate_checkout(
        &self,
        user_id: &str,
        input: CheckoutInput,
        description: Option<&str>,
    ) -> CheckoutResult<InitiatedCheckout> {
        if user_id.trim().is_empty() {
            return Err(CheckoutError::MissingField("user_id"));
        }
        let total_source = input.source_total()?;

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(self.settings.default_description.as_str())
            .to_string();
        let reference_id = format!("PA-{}", Utc::now().timestamp_millis());

        let order = self
            .gateway
            .create_order(total_source, &description, &reference_id)
            .await?;

        let now = Utc::now();
        let record = CheckoutOrder {
            order_id: order.id.clone(),
            user_id: user_id.to_string(),
            reference_id,
            description,
            total_source,
            amount_target: order.amount,
            currency: order.currency.clone(),
            status: order.status.clone(),
            capture_id: None,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.repos.checkout_orders().save(record).await {
            error!(order_id = %order.id, user_id, error = %e, "Provider order opened but not recorded");
            return Err(CheckoutError::Storage(e.to_string()));
        }

        metrics::counter!(ORDERS_CREATED).increment(1);
        info!(
            order_id = %order.id,
            user_id,
            total_source,
            amount = %order.amount,
            currency = %order.currency,
            "Checkout initiated"
        );

        Ok(InitiatedCheckout {
            order_id: order.id,
            status: order.status,
            links: order.links,
            total_source,
            amount_target: order.amount,
            currency: order.currency,
        })
    }

    /// Phase B: capture the approved order and, once the provider reports
    /// COMPLETED, write the booking.
    pub async fn complete_checkout(
        &self,
        user_id: &str,
        request: CompleteCheckout,
    ) -> CheckoutResult<CheckoutOutcome> {
        let result = self.capture_and_book(user_id, request).await;

        let outcome = match &result {
            Ok(CheckoutOutcome::Booked { .. }) => "booked",
            Ok(CheckoutOutcome::NotCompleted { .. }) => "not_completed",
            Err(CheckoutError::DuplicateBooking) => "duplicate",
            Err(e) if e.is_client_error() => "rejected",
            Err(_) => "failed",
        };
        metrics::counter!(CAPTURES, "outcome" => outcome).increment(1);

        result
    }

    async fn capture_and_book(
        &self,
        user_id: &str,
        request: CompleteCheckout,
    ) -> CheckoutResult<CheckoutOutcome> {
        if user_id.trim().is_empty() {
            return Err(CheckoutError::MissingField("user_id"));
        }
        let request = request.into_request()?;
        let order_id = request.order_id.as_str();

        if self.settings.bind_orders {
            let bound = self
                .repos
                .checkout_orders()
                .find_by_order_id(order_id)
                .await?
                .is_some_and(|o| o.belongs_to(user_id));
            if !bound {
                warn!(order_id, user_id, "Capture refused for order not opened by this user");
                return Err(CheckoutError::OrderNotBound(order_id.to_string()));
            }
        }

        let capture = self.gateway.capture_order(order_id).await?;

        if let Err(e) = self
            .repos
            .checkout_orders()
            .record_capture(order_id, &capture.status, capture.capture_id.as_deref())
            .await
        {
            warn!(order_id, error = %e, "Could not record capture outcome");
        }

        if !capture.status.is_completed() {
            info!(order_id, status = %capture.status, "Payment not completed, no booking");
            return Ok(CheckoutOutcome::NotCompleted {
                order_id: order_id.to_string(),
                status: capture.status,
                raw: capture.raw,
            });
        }

        let new_booking = NewBooking {
            user_id: user_id.to_string(),
            service_type: request.service_type,
            scheduled_at: request.scheduled_at,
            duration_mins: request.duration_mins,
            price: request.price,
            payment: PaymentInfo::new(
                order_id,
                capture.capture_id.clone(),
                PaymentStatus::from_order_status(&capture.status),
            ),
            notes: request.notes,
        };

        match self.repos.bookings().create_booking(new_booking).await {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    order_id,
                    capture_id = capture.capture_id.as_deref().unwrap_or("-"),
                    user_id,
                    "Booking confirmed"
                );
                Ok(CheckoutOutcome::Booked { booking, capture })
            }
            Err(CheckoutError::DuplicateBooking) => {
                info!(order_id, user_id, "Booking already exists for this slot or order");
                Err(CheckoutError::DuplicateBooking)
            }
            Err(e) => {
                error!(
                    order_id,
                    capture_id = capture.capture_id.as_deref().unwrap_or("-"),
                    user_id,
                    error = %e,
                    "Payment captured but booking not recorded"
                );
                Err(CheckoutError::BookingNotRecorded {
                    order_id: order_id.to_string(),
                    capture_id: capture.capture_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Bookings of one user, newest first
    pub async fn bookings_for_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> CheckoutResult<PaginatedResult<Booking>> {
        self.repos.bookings().find_by_user(user_id, page, limit).await
    }
}
