//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::checkout_order::CheckoutOrderRepository;
use crate::domain::repositories::RepositoryProvider;

use super::booking_repository::SeaOrmBookingRepository;
use super::checkout_order_repository::SeaOrmCheckoutOrderRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let order = repos.checkout_orders().find_by_order_id("5O190127TN364715T").await?;
/// let booking = repos.bookings().find_by_order_id("5O190127TN364715T").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    bookings: SeaOrmBookingRepository,
    checkout_orders: SeaOrmCheckoutOrderRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            bookings: SeaOrmBookingRepository::new(db.clone()),
            checkout_orders: SeaOrmCheckoutOrderRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn checkout_orders(&self) -> &dyn CheckoutOrderRepository {
        &self.checkout_orders
    }
}
