//! Checkout order entity
//!
//! Local record of a provider order created in the first checkout phase. It
//! ties the order id to the user who created it and tracks the last status
//! seen from the provider.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::payment::OrderStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    /// Provider order id (primary key)
    pub order_id: String,
    pub user_id: String,
    pub reference_id: String,
    pub description: String,
    /// Source-currency total
    pub total_source: i64,
    /// Target-currency amount sent to the provider
    pub amount_target: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub capture_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckoutOrder {
    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
