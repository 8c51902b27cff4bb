//! Read-side storage contract consumed by the receipt pipeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PaymentRecord, ViolationOccurrence};

/// Storage failure, split so callers can tell an outage from a bad query.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(anyhow::Error),

    #[error("storage query failed: {0}")]
    Query(anyhow::Error),
}

/// Source of payments, citations and violations keyed by identifier.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Payment with the given receipt number, joined with its citation.
    async fn find_payment_with_citation(
        &self,
        receipt_number: &str,
    ) -> Result<Option<PaymentRecord>, StoreError>;

    /// Violations on a citation joined with their tariffs, in recorded order.
    async fn find_violations_with_tariff(
        &self,
        citation_id: i64,
    ) -> Result<Vec<ViolationOccurrence>, StoreError>;

    /// Liveness probe for health endpoints.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
