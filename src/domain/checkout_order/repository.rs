//! Checkout order repository interface

use async_trait::async_trait;

use super::model::CheckoutOrder;
use crate::domain::payment::OrderStatus;
use crate::domain::DomainResult;

#[async_trait]
pub trait CheckoutOrderRepository: Send + Sync {
    /// Save a freshly created order
    async fn save(&self, order: CheckoutOrder) -> DomainResult<()>;

    /// Find order by provider order id
    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<CheckoutOrder>>;

    /// Record the outcome of a capture attempt. Unknown ids are ignored.
    async fn record_capture(
        &self,
        order_id: &str,
        status: &OrderStatus,
        capture_id: Option<&str>,
    ) -> DomainResult<()>;
}
