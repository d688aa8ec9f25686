//! In-memory repositories for development and testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRepository, BookingSlot, NewBooking};
use crate::domain::checkout_order::{CheckoutOrder, CheckoutOrderRepository};
use crate::domain::payment::OrderStatus;
use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::errors::CheckoutError;
use crate::shared::PaginatedResult;

/// Booking ledger kept in process memory.
///
/// The slot and order indexes are claimed through the maps' entry API, which
/// holds the shard lock for the check and the insert, so two concurrent
/// writers of the same slot cannot both succeed. Indexes are always locked
/// slot first, then order.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: DashMap<Uuid, Booking>,
    slots: DashMap<BookingSlot, Uuid>,
    orders: DashMap<String, Uuid>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create_booking(&self, booking: NewBooking) -> DomainResult<Booking> {
        booking.validate()?;

        let booking = booking.into_booking(Utc::now());
        let Entry::Vacant(slot) = self.slots.entry(booking.slot()) else {
            return Err(CheckoutError::DuplicateBooking);
        };
        let Entry::Vacant(order) = self.orders.entry(booking.payment.order_id.clone()) else {
            return Err(CheckoutError::DuplicateBooking);
        };

        self.bookings.insert(booking.id, booking.clone());
        order.insert(booking.id);
        slot.insert(booking.id);
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<Booking>> {
        let Some(id) = self.orders.get(order_id).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let mut mine: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.value().clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = mine.len() as u64;
        let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let items = mine.into_iter().skip(offset).take(limit as usize).collect();

        Ok(PaginatedResult::new(items, total, page, limit))
    }
}

/// Checkout order register kept in process memory
#[derive(Default)]
pub struct InMemoryCheckoutOrderRepository {
    orders: DashMap<String, CheckoutOrder>,
}

impl InMemoryCheckoutOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutOrderRepository for InMemoryCheckoutOrderRepository {
    async fn save(&self, order: CheckoutOrder) -> DomainResult<()> {
        match self.orders.entry(order.order_id.clone()) {
            Entry::Occupied(_) => Err(CheckoutError::Storage(format!(
                "checkout order {} already recorded",
                order.order_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order);
                Ok(())
            }
        }
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<CheckoutOrder>> {
        Ok(self.orders.get(order_id).map(|o| o.clone()))
    }

    async fn record_capture(
        &self,
        order_id: &str,
        status: &OrderStatus,
        capture_id: Option<&str>,
    ) -> DomainResult<()> {
        if let Some(mut order) = self.orders.get_mut(order_id) {
            order.status = status.clone();
            if let Some(capture_id) = capture_id {
                order.capture_id = Some(capture_id.to_string());
            }
            order.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// Repository provider backed by the in-memory stores
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    bookings: InMemoryBookingRepository,
    checkout_orders: InMemoryCheckoutOrderRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn checkout_orders(&self) -> &dyn CheckoutOrderRepository {
        &self.checkout_orders
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::booking::{PaymentInfo, PaymentStatus, ServiceType};

    fn new_booking(order_id: &str, hour: u32) -> NewBooking {
        NewBooking {
            user_id: "user-1".into(),
            service_type: ServiceType::ShortWalk,
            scheduled_at: Utc.with_ymd_and_hms(2026, 11, 2, hour, 0, 0).unwrap(),
            duration_mins: 30,
            price: Decimal::new(770, 2),
            payment: PaymentInfo::new(order_id, Some("CAP1".into()), PaymentStatus::Completed),
            notes: None,
        }
    }

    #[tokio::test]
    async fn same_slot_is_rejected() {
        let repo = InMemoryBookingRepository::new();
        let first = repo.create_booking(new_booking("ORDER-1", 10)).await.unwrap();

        let second = repo.create_booking(new_booking("ORDER-2", 10)).await;
        assert!(matches!(second, Err(CheckoutError::DuplicateBooking)));

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn different_duration_is_a_different_slot() {
        let repo = InMemoryBookingRepository::new();
        repo.create_booking(new_booking("ORDER-1", 10)).await.unwrap();

        let mut longer = new_booking("ORDER-2", 10);
        longer.duration_mins = 60;
        assert!(repo.create_booking(longer).await.is_ok());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn one_order_pays_for_one_booking() {
        let repo = InMemoryBookingRepository::new();
        repo.create_booking(new_booking("ORDER-1", 10)).await.unwrap();

        let other_slot = repo.create_booking(new_booking("ORDER-1", 11)).await;
        assert!(matches!(other_slot, Err(CheckoutError::DuplicateBooking)));
        assert_eq!(repo.len(), 1);

        // the slot rejected above stays free
        assert!(repo.create_booking(new_booking("ORDER-2", 11)).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_booking_is_not_stored() {
        let repo = InMemoryBookingRepository::new();
        let mut bad = new_booking("ORDER-1", 10);
        bad.duration_mins = 0;
        assert!(matches!(
            repo.create_booking(bad).await,
            Err(CheckoutError::Validation(_))
        ));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn concurrent_writers_of_one_slot_yield_one_booking() {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create_booking(new_booking(&format!("ORDER-{}", i), 9)).await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(CheckoutError::DuplicateBooking) => duplicates += 1,
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn bookings_are_listed_per_user() {
        let repo = InMemoryBookingRepository::new();
        for hour in 8..13 {
            repo.create_booking(new_booking(&format!("ORDER-{}", hour), hour))
                .await
                .unwrap();
        }
        let mut other = new_booking("ORDER-X", 8);
        other.user_id = "user-2".into();
        repo.create_booking(other).await.unwrap();

        let page = repo.find_by_user("user-1", 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);

        let found = repo.find_by_order_id("ORDER-X").await.unwrap().unwrap();
        assert_eq!(found.user_id, "user-2");
    }

    #[tokio::test]
    async fn capture_is_recorded_on_known_orders_only() {
        let repo = InMemoryCheckoutOrderRepository::new();
        let now = Utc::now();
        repo.save(CheckoutOrder {
            order_id: "ORDER-1".into(),
            user_id: "user-1".into(),
            reference_id: "PA-1".into(),
            description: "Paseo".into(),
            total_source: 7000,
            amount_target: Decimal::new(770, 2),
            currency: "USD".into(),
            status: OrderStatus::Created,
            capture_id: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

        repo.record_capture("ORDER-1", &OrderStatus::Completed, Some("CAP1"))
            .await
            .unwrap();
        repo.record_capture("ORDER-404", &OrderStatus::Completed, None)
            .await
            .unwrap();

        let order = repo.find_by_order_id("ORDER-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.capture_id.as_deref(), Some("CAP1"));
        assert!(repo.find_by_order_id("ORDER-404").await.unwrap().is_none());
    }
}
