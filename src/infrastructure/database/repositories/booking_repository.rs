//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::booking::{
    Booking, BookingRepository, NewBooking, PaymentInfo, PaymentStatus, ServiceType,
};
use crate::domain::money::{from_cents, to_cents};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::booking;
use crate::shared::errors::CheckoutError;
use crate::shared::PaginatedResult;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let id = Uuid::parse_str(&m.id)
        .map_err(|e| CheckoutError::Storage(format!("corrupt booking id '{}': {}", m.id, e)))?;
    let service_type: ServiceType = m
        .service_type
        .parse()
        .map_err(|_| CheckoutError::Storage(format!("corrupt service type '{}'", m.service_type)))?;

    Ok(Booking {
        id,
        user_id: m.user_id,
        service_type,
        scheduled_at: m.scheduled_at,
        duration_mins: m.duration_mins,
        price: from_cents(m.price_cents),
        payment: PaymentInfo {
            provider: m.payment_provider,
            order_id: m.payment_order_id,
            capture_id: m.payment_capture_id,
            status: PaymentStatus::from_stored(&m.payment_status),
        },
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn db_err(e: DbErr) -> CheckoutError {
    CheckoutError::Storage(format!("Database error: {}", e))
}

/// Unique index hits mean the slot (or the paying order) is already booked.
fn insert_err(e: DbErr) -> CheckoutError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!("Booking rejected by unique index: {}", detail);
            CheckoutError::DuplicateBooking
        }
        _ => {
            warn!("Booking insert failed: {}", e);
            db_err(e)
        }
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create_booking(&self, b: NewBooking) -> DomainResult<Booking> {
        b.validate()?;

        let price_cents = to_cents(b.price)?;
        let booking = b.into_booking(Utc::now());

        debug!(
            "Saving booking {} for user {} (order {})",
            booking.id, booking.user_id, booking.payment.order_id
        );

        let model = booking::ActiveModel {
            id: Set(booking.id.to_string()),
            user_id: Set(booking.user_id.clone()),
            service_type: Set(booking.service_type.as_str().to_string()),
            scheduled_at: Set(booking.scheduled_at),
            duration_mins: Set(booking.duration_mins),
            price_cents: Set(price_cents),
            payment_provider: Set(booking.payment.provider.clone()),
            payment_order_id: Set(booking.payment.order_id.clone()),
            payment_capture_id: Set(booking.payment.capture_id.clone()),
            payment_status: Set(booking.payment.status.as_str().to_string()),
            notes: Set(booking.notes.clone()),
            created_at: Set(booking.created_at),
            updated_at: Set(booking.updated_at),
        };
        model.insert(&self.db).await.map_err(insert_err)?;

        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find()
            .filter(booking::Column::PaymentOrderId.eq(order_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let query = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .order_by_desc(booking::Column::ScheduledAt);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = (page.max(1) as u64 - 1) * limit as u64;
        let models = query
            .offset(offset)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, page, limit))
    }
}
