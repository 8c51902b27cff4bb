//! Payment-viewing capability check.
//!
//! The admin front end authenticates the user and forwards identity and
//! capabilities as headers. Those headers are only trusted from the front
//! end, so this service must not be exposed directly.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::receipt::error::{ReceiptError, MSG_FORBIDDEN};

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const CAPABILITIES_HEADER: &str = "X-User-Capabilities";

/// Receipt service capabilities.
pub mod capabilities {
    /// View payment records and print their receipts.
    pub const PAYMENT_READ: &str = "citations.payment:read";
}

/// Whether capability headers are enforced.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityPolicy {
    pub enforce: bool,
}

/// A caller allowed to view payment records.
#[derive(Debug, Clone)]
pub struct PaymentViewer {
    pub user_id: Option<String>,
}

fn has_capability(parts: &Parts, capability: &str) -> bool {
    parts
        .headers
        .get(CAPABILITIES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|list| list.split(',').any(|c| c.trim() == capability))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequestParts<S> for PaymentViewer
where
    CapabilityPolicy: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ReceiptError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let policy = CapabilityPolicy::from_ref(state);

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if policy.enforce
            && (user_id.is_none() || !has_capability(parts, capabilities::PAYMENT_READ))
        {
            tracing::warn!(
                user_id = user_id.as_deref().unwrap_or("-"),
                "Payment viewing capability missing"
            );
            return Err(ReceiptError::Forbidden(MSG_FORBIDDEN.to_string()));
        }

        if let Some(id) = &user_id {
            tracing::Span::current().record("user_id", id.as_str());
        }

        Ok(PaymentViewer { user_id })
    }
}
