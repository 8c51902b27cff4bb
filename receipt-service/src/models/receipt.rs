//! Receipt document model for receipt-service.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{PaymentCategory, PaymentMethod};

/// One violation line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    pub label: String,
    pub amount: Decimal,
}

/// Render-ready projection of a payment, its citation and violations.
///
/// Built fresh for every request and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDocument {
    pub receipt_number: String,
    pub ticket_number: String,
    pub date: String,
    pub payor: String,
    /// Every violation in fetch order. The printed layout may show fewer.
    pub lines: Vec<ReceiptLine>,
    pub total: Decimal,
    pub amount_in_words: String,
    pub amount_paid: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_category: PaymentCategory,
    pub reference_number: Option<String>,
}

impl ReceiptDocument {
    /// Deterministic file name for the rendered document.
    pub fn file_name(&self) -> String {
        format!("receipt_{}.pdf", self.receipt_number)
    }
}
