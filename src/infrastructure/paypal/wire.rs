//! PayPal REST v2 request/response bodies
//!
//! Only the fields the checkout flow reads are modelled; everything else is
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::domain::payment::ApprovalLink;

// ── OAuth ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

// ── Create order ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OrderPayload<'a> {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnitRequest<'a>>,
    pub application_context: ApplicationContext<'a>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitRequest<'a> {
    pub reference_id: &'a str,
    pub description: &'a str,
    pub amount: AmountWithBreakdown<'a>,
}

#[derive(Debug, Serialize)]
pub struct AmountWithBreakdown<'a> {
    pub currency_code: &'a str,
    pub value: String,
    pub breakdown: Breakdown<'a>,
}

#[derive(Debug, Serialize)]
pub struct Breakdown<'a> {
    pub item_total: Money<'a>,
}

#[derive(Debug, Serialize)]
pub struct Money<'a> {
    pub currency_code: &'a str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationContext<'a> {
    pub brand_name: &'a str,
    pub shipping_preference: &'static str,
    pub user_action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub links: Vec<ApprovalLink>,
}

// ── Capture ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CaptureResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_units: Vec<CapturedUnit>,
}

#[derive(Debug, Deserialize)]
pub struct CapturedUnit {
    #[serde(default)]
    pub payments: Option<CapturedPayments>,
}

#[derive(Debug, Deserialize)]
pub struct CapturedPayments {
    #[serde(default)]
    pub captures: Vec<CaptureRef>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRef {
    pub id: String,
}

impl CaptureResponse {
    /// First capture of the first purchase unit
    pub fn first_capture_id(&self) -> Option<&str> {
        self.purchase_units
            .first()
            .and_then(|u| u.payments.as_ref())
            .and_then(|p| p.captures.first())
            .map(|c| c.id.as_str())
    }
}
