//! Checkout DTOs
//!
//! Field aliases accept the camelCase names sent by the web frontend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{CartLine, CheckoutInput, CompleteCheckout, InitiatedCheckout};
use crate::domain::booking::MAX_NOTES_LEN;
use crate::domain::payment::ApprovalLink;
use crate::interfaces::http::modules::bookings::BookingDto;
use crate::shared::errors::{CheckoutError, CheckoutResult};

/// Provider orders reject longer descriptions
const MAX_DESCRIPTION_LEN: u64 = 127;
const MAX_NOTES: u64 = MAX_NOTES_LEN as u64;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLineDto {
    pub name: Option<String>,
    /// Unit price in whole source-currency units
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Either a cart or a single source-currency amount
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub cart: Option<Vec<CartLineDto>>,
    #[serde(alias = "amountClp")]
    pub amount: Option<Decimal>,
    #[validate(length(max = MAX_DESCRIPTION_LEN, message = "description is too long"))]
    pub description: Option<String>,
}

impl CreateOrderRequest {
    pub fn checkout_input(&self) -> CheckoutResult<CheckoutInput> {
        match (&self.cart, self.amount) {
            (Some(cart), _) => Ok(CheckoutInput::Cart(
                cart.iter()
                    .map(|line| CartLine {
                        name: line.name.clone(),
                        price: line.price,
                        quantity: line.quantity,
                    })
                    .collect(),
            )),
            (None, Some(amount)) => Ok(CheckoutInput::Amount(amount)),
            (None, None) => Err(CheckoutError::MissingField("cart")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LinkDto {
    pub href: String,
    pub rel: String,
    pub method: Option<String>,
}

impl From<ApprovalLink> for LinkDto {
    fn from(l: ApprovalLink) -> Self {
        Self {
            href: l.href,
            rel: l.rel,
            method: l.method,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub status: String,
    /// Where the payer approves the order
    pub approve_url: Option<String>,
    pub links: Vec<LinkDto>,
    /// Cart total in source-currency units
    pub total_source: i64,
    /// Amount the provider will charge
    pub amount_target: Decimal,
    pub currency: String,
}

impl From<InitiatedCheckout> for CreateOrderResponse {
    fn from(c: InitiatedCheckout) -> Self {
        let approve_url = c
            .links
            .iter()
            .find(|l| l.rel == "approve" || l.rel == "payer-action")
            .map(|l| l.href.clone());
        Self {
            order_id: c.order_id,
            status: c.status.as_str().to_string(),
            approve_url,
            links: c.links.into_iter().map(LinkDto::from).collect(),
            total_source: c.total_source,
            amount_target: c.amount_target,
            currency: c.currency,
        }
    }
}

/// Second phase: the approved order plus the booking to record.
///
/// Every field is optional so a missing one is reported by name.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CaptureOrderRequest {
    #[serde(alias = "orderId", alias = "orderID")]
    pub order_id: Option<String>,
    #[serde(alias = "serviceType")]
    pub service_type: Option<String>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` (UTC)
    #[serde(alias = "dateTime", alias = "date")]
    pub date_time: Option<String>,
    #[serde(alias = "durationMins")]
    pub duration_mins: Option<i32>,
    pub price: Option<Decimal>,
    #[validate(length(max = MAX_NOTES, message = "notes are too long"))]
    pub notes: Option<String>,
}

impl From<CaptureOrderRequest> for CompleteCheckout {
    fn from(r: CaptureOrderRequest) -> Self {
        Self {
            order_id: r.order_id,
            service_type: r.service_type,
            date_time: r.date_time,
            duration_mins: r.duration_mins,
            price: r.price,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CaptureOrderResponse {
    pub booking: BookingDto,
    pub capture_id: Option<String>,
    /// Provider capture response, as received
    #[schema(value_type = Object)]
    pub provider: serde_json::Value,
}

/// Payload of a 422: the provider did not complete the payment.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentNotCompletedDto {
    pub order_id: String,
    pub status: String,
    #[schema(value_type = Object)]
    pub provider: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cart_takes_precedence_over_amount() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "cart": [{"name": "Paseo 60", "price": 7000}],
            "amount": 1
        }))
        .unwrap();
        match req.checkout_input().unwrap() {
            CheckoutInput::Cart(lines) => {
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0].quantity, 1);
            }
            other => panic!("expected cart, got {:?}", other),
        }
    }

    #[test]
    fn legacy_amount_field_is_accepted() {
        let req: CreateOrderRequest = serde_json::from_value(json!({"amountClp": 7000})).unwrap();
        assert_eq!(
            req.checkout_input().unwrap(),
            CheckoutInput::Amount(Decimal::from(7000))
        );
    }

    #[test]
    fn empty_request_names_missing_cart() {
        let req: CreateOrderRequest = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            req.checkout_input(),
            Err(CheckoutError::MissingField("cart"))
        ));
    }

    #[test]
    fn capture_request_accepts_frontend_names() {
        let req: CaptureOrderRequest = serde_json::from_value(json!({
            "orderID": "ORDER-1",
            "serviceType": "long-walk",
            "dateTime": "2026-11-02T15:00:00Z",
            "durationMins": 60,
            "price": "7.70"
        }))
        .unwrap();
        let complete = CompleteCheckout::from(req);
        assert_eq!(complete.order_id.as_deref(), Some("ORDER-1"));
        assert_eq!(complete.duration_mins, Some(60));
        assert_eq!(complete.price, Some(Decimal::new(770, 2)));
    }

    #[test]
    fn long_description_fails_validation() {
        let req = CreateOrderRequest {
            cart: None,
            amount: Some(Decimal::from(7000)),
            description: Some("x".repeat(MAX_DESCRIPTION_LEN as usize + 1)),
        };
        assert!(req.validate().is_err());
    }
}
