//! Booking ledger interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Booking, NewBooking};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Persistent store of confirmed bookings.
///
/// Implementations must enforce uniqueness of
/// (user, scheduled date-time, service type, duration) atomically and report
/// a violation as `CheckoutError::DuplicateBooking`. There is no update or
/// delete operation.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Validate and insert a booking
    async fn create_booking(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Find the booking paid by a provider order
    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<Booking>>;

    /// Bookings of one user, newest first
    async fn find_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Booking>>;
}
