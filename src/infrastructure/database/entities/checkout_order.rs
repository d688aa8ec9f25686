//! Checkout order entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checkout_orders")]
pub struct Model {
    /// Provider order id
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: String,

    pub user_id: String,
    pub reference_id: String,
    pub description: String,

    /// Source-currency total (whole units)
    pub total_source: i64,

    /// Target-currency amount in cents
    pub amount_cents: i64,
    pub currency: String,

    /// Last provider status seen
    pub status: String,

    #[sea_orm(nullable)]
    pub capture_id: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
