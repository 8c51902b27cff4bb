//! Citation model for receipt-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Traffic citation issued to a driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub citation_id: i64,
    pub ticket_number: String,
    pub driver_first_name: String,
    pub driver_last_name: String,
    /// Aggregate recorded at issuance. Informational only; receipts recompute
    /// the total from the violation tariffs.
    pub total_fine: Decimal,
}

impl Citation {
    /// Payor name as printed on the receipt.
    pub fn payor_name(&self) -> String {
        format!("{} {}", self.driver_first_name.trim(), self.driver_last_name.trim())
            .trim()
            .to_uppercase()
    }
}
