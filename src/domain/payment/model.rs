//! Provider order shapes, normalized

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status as reported by the provider.
///
/// Unknown values are kept verbatim in `Other`; only `Completed` means the
/// funds were captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    PayerActionRequired,
    Other(String),
}

impl OrderStatus {
    pub fn from_provider(s: &str) -> Self {
        match s {
            "CREATED" => Self::Created,
            "SAVED" => Self::Saved,
            "APPROVED" => Self::Approved,
            "VOIDED" => Self::Voided,
            "COMPLETED" => Self::Completed,
            "PAYER_ACTION_REQUIRED" => Self::PayerActionRequired,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Saved => "SAVED",
            Self::Approved => "APPROVED",
            Self::Voided => "VOIDED",
            Self::Completed => "COMPLETED",
            Self::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            Self::Other(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HATEOAS link returned with a created order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalLink {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Result of a successful create-order call
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub id: String,
    pub status: OrderStatus,
    pub links: Vec<ApprovalLink>,
    /// Converted amount sent to the provider
    pub amount: Decimal,
    pub currency: String,
}

impl CreatedOrder {
    /// The link the payer must follow to approve the order.
    pub fn approve_link(&self) -> Option<&ApprovalLink> {
        self.links
            .iter()
            .find(|l| l.rel == "approve" || l.rel == "payer-action")
    }
}

/// Result of a successful capture call
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOrder {
    pub id: String,
    pub status: OrderStatus,
    /// `purchase_units[0].payments.captures[0].id`, when present
    pub capture_id: Option<String>,
    /// Provider response body, for diagnostics only
    pub raw: serde_json::Value,
}
