//! Booking DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::booking::Booking;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub provider: String,
    pub order_id: String,
    pub capture_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub service_type: String,
    /// RFC 3339, UTC
    pub scheduled_at: String,
    pub duration_mins: i32,
    /// Target-currency price, two decimals
    pub price: Decimal,
    pub payment: PaymentDto,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id.to_string(),
            user_id: b.user_id,
            service_type: b.service_type.as_str().to_string(),
            scheduled_at: b.scheduled_at.to_rfc3339(),
            duration_mins: b.duration_mins,
            price: b.price,
            payment: PaymentDto {
                provider: b.payment.provider,
                order_id: b.payment.order_id,
                capture_id: b.payment.capture_id,
                status: b.payment.status.as_str().to_string(),
            },
            notes: b.notes,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}
