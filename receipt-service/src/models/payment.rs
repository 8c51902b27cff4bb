//! Payment model for receipt-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Citation;

/// Payment method recorded against a citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Gcash,
    Paymaya,
    BankTransfer,
    Online,
    Other(String),
}

/// Which checkbox a payment method marks on the printed receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCategory {
    Cash,
    Electronic,
    Unmarked,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Gcash => "GCASH",
            PaymentMethod::Paymaya => "PAYMAYA",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Online => "ONLINE",
            PaymentMethod::Other(raw) => raw,
        }
    }

    /// Parse a stored method name. Matching is case-insensitive; unknown
    /// names are kept verbatim as `Other`.
    pub fn from_string(s: &str) -> Self {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "CASH" => PaymentMethod::Cash,
            "GCASH" => PaymentMethod::Gcash,
            "PAYMAYA" => PaymentMethod::Paymaya,
            "BANK_TRANSFER" => PaymentMethod::BankTransfer,
            "ONLINE" => PaymentMethod::Online,
            _ => PaymentMethod::Other(s.trim().to_string()),
        }
    }

    pub fn category(&self) -> PaymentCategory {
        match self {
            PaymentMethod::Cash => PaymentCategory::Cash,
            PaymentMethod::Gcash
            | PaymentMethod::Paymaya
            | PaymentMethod::BankTransfer
            | PaymentMethod::Online => PaymentCategory::Electronic,
            PaymentMethod::Other(_) => PaymentCategory::Unmarked,
        }
    }
}

/// Payment made against a citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub citation_id: i64,
    pub receipt_number: String,
    pub amount_paid: Decimal,
    pub payment_method: PaymentMethod,
    /// Stored timestamp text, formatted for display at receipt time.
    pub payment_date: String,
    pub reference_number: Option<String>,
}

/// A payment joined with its parent citation.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment: Payment,
    pub citation: Citation,
}
