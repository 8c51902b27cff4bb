pub mod error_page;
pub mod health;
pub mod receipts;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use receipts::{preview_receipt, print_receipt};
