//! Offense-tier fine resolution.

use rust_decimal::Decimal;

use crate::models::ViolationTypeTariff;

/// Fine for a violation given how many times the driver has committed it.
///
/// Missing second or third tiers fall back to the first-offense amount.
/// Counts below one are treated as a first offense.
pub fn resolve_fine(tariff: &ViolationTypeTariff, offense_count: i32) -> Decimal {
    let tier = match offense_count {
        i32::MIN..=1 => None,
        2 => tariff.second_offense,
        _ => tariff.third_offense,
    };

    tier.unwrap_or(tariff.first_offense)
}
