//! Assembles a receipt document from stored payment data.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{ReceiptDocument, ReceiptLine};
use crate::receipt::dates::format_date;
use crate::receipt::error::{
    ReceiptError, MSG_INVALID_RECEIPT, MSG_NO_VIOLATIONS, MSG_RECEIPT_NOT_FOUND,
    MSG_RECEIPT_REQUIRED,
};
use crate::receipt::fines::resolve_fine;
use crate::receipt::words::amount_in_words;
use crate::services::metrics::DOCUMENTS_TOTAL;
use crate::services::store::ReceiptStore;

/// Strip a raw receipt number down to `[A-Za-z0-9_-]`.
pub fn sanitize_receipt_number(raw: &str) -> Result<String, ReceiptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReceiptError::BadInput(MSG_RECEIPT_REQUIRED.to_string()));
    }

    let sanitized: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if sanitized.is_empty() {
        return Err(ReceiptError::BadInput(MSG_INVALID_RECEIPT.to_string()));
    }

    Ok(sanitized)
}

/// Builds receipt documents from a storage collaborator.
#[derive(Clone)]
pub struct ReceiptAggregator {
    store: Arc<dyn ReceiptStore>,
}

impl ReceiptAggregator {
    pub fn new(store: Arc<dyn ReceiptStore>) -> Self {
        Self { store }
    }

    /// Build the document for a receipt number.
    ///
    /// Every call reads current storage state; nothing is cached.
    #[instrument(skip(self), fields(receipt_number = %receipt_number))]
    pub async fn build(&self, receipt_number: &str) -> Result<ReceiptDocument, ReceiptError> {
        let receipt_number = sanitize_receipt_number(receipt_number)?;

        let record = self
            .store
            .find_payment_with_citation(&receipt_number)
            .await?
            .ok_or_else(|| {
                warn!("Receipt not found");
                ReceiptError::NotFound(MSG_RECEIPT_NOT_FOUND.to_string())
            })?;

        let citation_id = record.citation.citation_id;
        let occurrences = self.store.find_violations_with_tariff(citation_id).await?;
        if occurrences.is_empty() {
            warn!(citation_id = citation_id, "Citation has no violations");
            return Err(ReceiptError::NotFound(MSG_NO_VIOLATIONS.to_string()));
        }

        let lines: Vec<ReceiptLine> = occurrences
            .iter()
            .map(|occurrence| ReceiptLine {
                label: occurrence.tariff.label.trim().to_string(),
                amount: resolve_fine(&occurrence.tariff, occurrence.offense_count),
            })
            .collect();

        let total: Decimal = lines.iter().map(|line| line.amount).sum();

        let payment = record.payment;
        let document = ReceiptDocument {
            receipt_number: payment.receipt_number,
            ticket_number: record.citation.ticket_number.clone(),
            date: format_date(&payment.payment_date),
            payor: record.citation.payor_name(),
            amount_in_words: amount_in_words(total),
            total,
            lines,
            amount_paid: payment.amount_paid,
            payment_category: payment.payment_method.category(),
            payment_method: payment.payment_method,
            reference_number: payment
                .reference_number
                .filter(|reference| !reference.trim().is_empty()),
        };

        if document.amount_paid != total {
            warn!(
                amount_paid = %document.amount_paid,
                total = %total,
                "Recorded payment differs from resolved fines"
            );
        }

        DOCUMENTS_TOTAL.with_label_values(&["built"]).inc();
        info!(
            citation_id = citation_id,
            violation_count = document.lines.len(),
            total = %document.total,
            "Receipt document built"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_receipt_number(" R-0001 ").unwrap(), "R-0001");
        assert_eq!(sanitize_receipt_number("OR_2024-17").unwrap(), "OR_2024-17");
        assert_eq!(
            sanitize_receipt_number("R-0001'; DROP TABLE payments;--").unwrap(),
            "R-0001DROPTABLEpayments--"
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_input() {
        assert_eq!(
            sanitize_receipt_number("   "),
            Err(ReceiptError::BadInput(MSG_RECEIPT_REQUIRED.to_string()))
        );
        assert_eq!(
            sanitize_receipt_number("<>'\""),
            Err(ReceiptError::BadInput(MSG_INVALID_RECEIPT.to_string()))
        );
    }
}
