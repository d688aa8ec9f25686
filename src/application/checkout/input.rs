//! Checkout inputs and outputs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::booking::{parse_scheduled_at, Booking, ServiceType, MAX_NOTES_LEN};
use crate::domain::money::{to_cents, TARGET_SCALE};
use crate::domain::payment::{ApprovalLink, CapturedOrder, OrderStatus};
use crate::shared::errors::{CheckoutError, CheckoutResult};
use crate::shared::normalize_optional_text;

/// One cart line, priced in the source currency
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub name: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
}

/// What the first checkout phase charges for
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutInput {
    Cart(Vec<CartLine>),
    Amount(Decimal),
}

impl CheckoutInput {
    /// Source-currency total in whole units.
    ///
    /// The source currency has no minor unit, so fractional prices are
    /// rejected rather than rounded.
    pub fn source_total(&self) -> CheckoutResult<i64> {
        match self {
            Self::Amount(amount) => whole_units(*amount, "amount"),
            Self::Cart(lines) => {
                if lines.is_empty() {
                    return Err(CheckoutError::InvalidCart("cart is empty".to_string()));
                }

                let mut total: i64 = 0;
                for (idx, line) in lines.iter().enumerate() {
                    let label = line
                        .name
                        .as_deref()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("line {}", idx + 1));

                    let price = whole_units(line.price, &label)?;
                    if line.quantity <= 0 {
                        return Err(CheckoutError::InvalidCart(format!(
                            "{}: quantity must be greater than zero",
                            label
                        )));
                    }

                    total = price
                        .checked_mul(line.quantity)
                        .and_then(|subtotal| total.checked_add(subtotal))
                        .ok_or_else(|| CheckoutError::InvalidCart("cart total overflows".to_string()))?;
                }
                Ok(total)
            }
        }
    }
}

fn whole_units(value: Decimal, label: &str) -> CheckoutResult<i64> {
    if value <= Decimal::ZERO {
        return Err(CheckoutError::InvalidCart(format!(
            "{}: price must be greater than zero",
            label
        )));
    }
    if !value.fract().is_zero() {
        return Err(CheckoutError::InvalidCart(format!(
            "{}: price must be a whole amount, got {}",
            label, value
        )));
    }
    i64::try_from(value)
        .map_err(|_| CheckoutError::InvalidCart(format!("{}: price is too large", label)))
}

/// Result of the first phase
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatedCheckout {
    pub order_id: String,
    pub status: OrderStatus,
    pub links: Vec<ApprovalLink>,
    pub total_source: i64,
    pub amount_target: Decimal,
    pub currency: String,
}

/// Second phase request, as echoed back by the client.
///
/// Every field is optional here so that absence is reported as
/// `MissingField` rather than as a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompleteCheckout {
    pub order_id: Option<String>,
    pub service_type: Option<String>,
    pub date_time: Option<String>,
    pub duration_mins: Option<i32>,
    pub price: Option<Decimal>,
    pub notes: Option<String>,
}

/// Booking fields checked before any provider call
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookingRequest {
    pub order_id: String,
    pub service_type: ServiceType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: i32,
    pub price: Decimal,
    pub notes: Option<String>,
}

fn required_text(value: Option<String>, field: &'static str) -> CheckoutResult<String> {
    normalize_optional_text(value).ok_or(CheckoutError::MissingField(field))
}

impl CompleteCheckout {
    pub(crate) fn into_request(self) -> CheckoutResult<BookingRequest> {
        let order_id = required_text(self.order_id, "order_id")?;
        let service_type = required_text(self.service_type, "service_type")?;
        let date_time = required_text(self.date_time, "date_time")?;
        let duration_mins = self.duration_mins.ok_or(CheckoutError::MissingField("duration_mins"))?;
        let price = self.price.ok_or(CheckoutError::MissingField("price"))?;

        let service_type: ServiceType = service_type.parse()?;
        let scheduled_at = parse_scheduled_at(&date_time)?;

        if duration_mins < 1 {
            return Err(CheckoutError::Validation(
                "duration_mins must be at least 1".to_string(),
            ));
        }
        if price < Decimal::ZERO {
            return Err(CheckoutError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        let notes = normalize_optional_text(self.notes);
        if notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_NOTES_LEN)
        {
            return Err(CheckoutError::Validation(format!(
                "notes must not exceed {} characters",
                MAX_NOTES_LEN
            )));
        }

        let mut price =
            price.round_dp_with_strategy(TARGET_SCALE, RoundingStrategy::MidpointAwayFromZero);
        price.rescale(TARGET_SCALE);
        // The ledger stores cents; a price it cannot hold must fail before capture
        to_cents(price)?;

        Ok(BookingRequest {
            order_id,
            service_type,
            scheduled_at,
            duration_mins,
            price,
            notes,
        })
    }
}

/// Result of the second phase
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Payment captured and booking written
    Booked {
        booking: Booking,
        capture: CapturedOrder,
    },
    /// Provider did not report COMPLETED; nothing was booked
    NotCompleted {
        order_id: String,
        status: OrderStatus,
        raw: serde_json::Value,
    },
}
