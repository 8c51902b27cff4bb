//! Services module for receipt-service.

pub mod database;
pub mod metrics;
pub mod store;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use store::{ReceiptStore, StoreError};
