//! SeaORM implementation of CheckoutOrderRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::checkout_order::{CheckoutOrder, CheckoutOrderRepository};
use crate::domain::money::{from_cents, to_cents};
use crate::domain::payment::OrderStatus;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::checkout_order;
use crate::shared::errors::CheckoutError;

pub struct SeaOrmCheckoutOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmCheckoutOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: checkout_order::Model) -> CheckoutOrder {
    CheckoutOrder {
        status: OrderStatus::from_provider(&m.status),
        amount_target: from_cents(m.amount_cents),
        order_id: m.order_id,
        user_id: m.user_id,
        reference_id: m.reference_id,
        description: m.description,
        total_source: m.total_source,
        currency: m.currency,
        capture_id: m.capture_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> CheckoutError {
    CheckoutError::Storage(format!("Database error: {}", e))
}

#[async_trait]
impl CheckoutOrderRepository for SeaOrmCheckoutOrderRepository {
    async fn save(&self, o: CheckoutOrder) -> DomainResult<()> {
        debug!("Saving checkout order {} for user {}", o.order_id, o.user_id);

        let model = checkout_order::ActiveModel {
            order_id: Set(o.order_id),
            user_id: Set(o.user_id),
            reference_id: Set(o.reference_id),
            description: Set(o.description),
            total_source: Set(o.total_source),
            amount_cents: Set(to_cents(o.amount_target)?),
            currency: Set(o.currency),
            status: Set(o.status.as_str().to_string()),
            capture_id: Set(o.capture_id),
            created_at: Set(o.created_at),
            updated_at: Set(o.updated_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<CheckoutOrder>> {
        let model = checkout_order::Entity::find_by_id(order_id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn record_capture(
        &self,
        order_id: &str,
        status: &OrderStatus,
        capture_id: Option<&str>,
    ) -> DomainResult<()> {
        let existing = checkout_order::Entity::find_by_id(order_id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            debug!("No checkout order {} to update", order_id);
            return Ok(());
        };

        let mut active: checkout_order::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        if let Some(capture_id) = capture_id {
            active.capture_id = Set(Some(capture_id.to_string()));
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
