//! Failure taxonomy for receipt generation.

use axum::http::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

use crate::services::store::StoreError;

pub const MSG_RECEIPT_REQUIRED: &str = "RECEIPT NUMBER IS REQUIRED";
pub const MSG_INVALID_RECEIPT: &str = "INVALID RECEIPT NUMBER";
pub const MSG_FORBIDDEN: &str = "YOU ARE NOT ALLOWED TO VIEW PAYMENT RECORDS";
pub const MSG_DB_UNAVAILABLE: &str = "DATABASE CONNECTION FAILED";
pub const MSG_RECEIPT_NOT_FOUND: &str = "RECEIPT NOT FOUND";
pub const MSG_NO_VIOLATIONS: &str = "NO VIOLATIONS FOUND";
pub const MSG_GENERATION_FAILED: &str = "RECEIPT GENERATION FAILED";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("{0}")]
    BadInput(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ReceiptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReceiptError::BadInput(_) => StatusCode::BAD_REQUEST,
            ReceiptError::Forbidden(_) => StatusCode::FORBIDDEN,
            ReceiptError::NotFound(_) => StatusCode::NOT_FOUND,
            ReceiptError::Unavailable(_) | ReceiptError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReceiptError::BadInput(_) => "bad_input",
            ReceiptError::Forbidden(_) => "forbidden",
            ReceiptError::Unavailable(_) => "unavailable",
            ReceiptError::NotFound(_) => "not_found",
            ReceiptError::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ReceiptError::BadInput(msg)
            | ReceiptError::Forbidden(msg)
            | ReceiptError::Unavailable(msg)
            | ReceiptError::NotFound(msg)
            | ReceiptError::Internal(msg) => msg,
        }
    }
}

impl From<StoreError> for ReceiptError {
    fn from(err: StoreError) -> Self {
        // Storage detail is logged, never returned to the caller.
        match err {
            StoreError::Unavailable(e) => {
                tracing::error!(error = %e, "Receipt storage unreachable");
                ReceiptError::Unavailable(MSG_DB_UNAVAILABLE.to_string())
            }
            StoreError::Query(e) => {
                tracing::error!(error = %e, "Receipt storage query failed");
                ReceiptError::Internal(MSG_GENERATION_FAILED.to_string())
            }
        }
    }
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::BadInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ReceiptError::Forbidden(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
            ReceiptError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            ReceiptError::Unavailable(msg) => AppError::DatabaseError(anyhow::anyhow!(msg)),
            ReceiptError::Internal(msg) => AppError::InternalError(anyhow::anyhow!(msg)),
        }
    }
}
