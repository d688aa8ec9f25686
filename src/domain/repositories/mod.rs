//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::booking::BookingRepository;
use super::checkout_order::CheckoutOrderRepository;
use crate::shared::errors::CheckoutError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, CheckoutError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let order = repos.checkout_orders().find_by_order_id("5O190127TN364715T").await?;
///     let mine = repos.bookings().find_by_user("user-1", 1, 20).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn bookings(&self) -> &dyn BookingRepository;
    fn checkout_orders(&self) -> &dyn CheckoutOrderRepository;
}
