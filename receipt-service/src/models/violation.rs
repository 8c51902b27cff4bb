//! Violation models for receipt-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fine schedule for one violation type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationTypeTariff {
    pub violation_type_id: i64,
    pub label: String,
    pub first_offense: Decimal,
    pub second_offense: Option<Decimal>,
    pub third_offense: Option<Decimal>,
}

/// One violation recorded on a citation, with the tariff it was charged under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationOccurrence {
    pub violation_id: i64,
    pub citation_id: i64,
    /// How many times the driver has committed this violation type, counting this one.
    pub offense_count: i32,
    pub tariff: ViolationTypeTariff,
}
