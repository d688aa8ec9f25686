//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// UUID v4, stored as text
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    /// short-walk, long-walk, full-service
    pub service_type: String,

    pub scheduled_at: DateTimeUtc,
    pub duration_mins: i32,

    /// Target-currency price in cents
    pub price_cents: i64,

    pub payment_provider: String,
    pub payment_order_id: String,

    #[sea_orm(nullable)]
    pub payment_capture_id: Option<String>,

    /// CREATED, APPROVED, COMPLETED, VOIDED, FAILED
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
