//! Order gateway port

use async_trait::async_trait;

use super::model::{CapturedOrder, CreatedOrder};
use crate::domain::DomainResult;

/// Two-phase order API of the payment provider.
///
/// Implementations are constructed explicitly and passed around as
/// `Arc<dyn PaymentGateway>`; nothing here touches process-wide state.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Reserve a provider order for `source_amount` (source currency).
    ///
    /// Fails with `InvalidAmount` before any network call when
    /// `source_amount <= 0`, and with `OrderCreation` on a non-success reply.
    async fn create_order(
        &self,
        source_amount: i64,
        description: &str,
        reference_id: &str,
    ) -> DomainResult<CreatedOrder>;

    /// Capture an approved order.
    ///
    /// Fails with `InvalidOrderId` for a blank id and with `OrderCapture` on a
    /// non-success reply. The returned status is the provider's, verbatim.
    async fn capture_order(&self, order_id: &str) -> DomainResult<CapturedOrder>;
}
