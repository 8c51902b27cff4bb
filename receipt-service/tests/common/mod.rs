//! Common test utilities for receipt-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use receipt_service::middleware::CapabilityPolicy;
use receipt_service::models::{
    Citation, Payment, PaymentMethod, PaymentRecord, ViolationOccurrence, ViolationTypeTariff,
};
use receipt_service::receipt::{ReceiptRenderer, REFERENCE_LAYOUT};
use receipt_service::services::{ReceiptStore, StoreError};
use receipt_service::startup::AppState;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,receipt_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn money(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

pub fn tariff(id: i64, label: &str, first: &str, second: Option<&str>, third: Option<&str>) -> ViolationTypeTariff {
    ViolationTypeTariff {
        violation_type_id: id,
        label: label.to_string(),
        first_offense: money(first),
        second_offense: second.map(money),
        third_offense: third.map(money),
    }
}

/// In-memory storage with switchable outage simulation.
#[derive(Default)]
pub struct InMemoryStore {
    citations: RwLock<HashMap<i64, Citation>>,
    payments: RwLock<HashMap<String, PaymentRecord>>,
    violations: RwLock<HashMap<i64, Vec<ViolationOccurrence>>>,
    offline: RwLock<bool>,
    queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_citation(&self, citation_id: i64, first_name: &str, last_name: &str) {
        let citation = Citation {
            citation_id,
            ticket_number: format!("TCK-{:05}", citation_id),
            driver_first_name: first_name.to_string(),
            driver_last_name: last_name.to_string(),
            total_fine: Decimal::ZERO,
        };
        self.citations.write().unwrap().insert(citation_id, citation);
    }

    pub fn add_payment(&self, receipt_number: &str, citation_id: i64, method: &str, paid: &str) {
        let citation = self
            .citations
            .read()
            .unwrap()
            .get(&citation_id)
            .cloned()
            .expect("add_citation first");

        let mut payments = self.payments.write().unwrap();
        let payment = Payment {
            payment_id: payments.len() as i64 + 1,
            citation_id,
            receipt_number: receipt_number.to_string(),
            amount_paid: money(paid),
            payment_method: PaymentMethod::from_string(method),
            payment_date: "2024-01-05 14:30:00".to_string(),
            reference_number: None,
        };

        payments.insert(receipt_number.to_string(), PaymentRecord { payment, citation });
    }

    pub fn set_reference(&self, receipt_number: &str, reference: &str) {
        if let Some(record) = self.payments.write().unwrap().get_mut(receipt_number) {
            record.payment.reference_number = Some(reference.to_string());
        }
    }

    pub fn add_violation(&self, citation_id: i64, tariff: ViolationTypeTariff, offense_count: i32) {
        let mut violations = self.violations.write().unwrap();
        let list = violations.entry(citation_id).or_default();
        list.push(ViolationOccurrence {
            violation_id: list.len() as i64 + 1,
            citation_id,
            offense_count,
            tariff,
        });
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.write().unwrap() = offline;
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.offline.read().unwrap() {
            return Err(StoreError::Unavailable(anyhow::anyhow!(
                "connection refused (os error 111)"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ReceiptStore for InMemoryStore {
    async fn find_payment_with_citation(
        &self,
        receipt_number: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        self.check_online()?;
        Ok(self.payments.read().unwrap().get(receipt_number).cloned())
    }

    async fn find_violations_with_tariff(
        &self,
        citation_id: i64,
    ) -> Result<Vec<ViolationOccurrence>, StoreError> {
        self.check_online()?;
        Ok(self
            .violations
            .read()
            .unwrap()
            .get(&citation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}

/// Store seeded with the reference scenarios.
///
/// - `R-0001`: two violations (500.00 first offense, 1000.00 second offense), GCASH.
/// - `R-0002`: citation with no violations, CASH.
/// - `R-0003`: eleven violations of 100.00 each, CHECK.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    store.add_citation(1, "Juan", "dela Cruz");
    store.add_payment("R-0001", 1, "GCASH", "1500.00");
    store.add_violation(1, tariff(1, "NO HELMET", "500.00", Some("1000.00"), Some("1500.00")), 1);
    store.add_violation(1, tariff(2, "BEATING THE RED LIGHT", "500.00", Some("1000.00"), None), 2);

    store.add_citation(2, "Maria", "Santos");
    store.add_payment("R-0002", 2, "cash", "0.00");

    store.add_citation(3, "Pedro", "Reyes");
    store.add_payment("R-0003", 3, "CHECK", "1100.00");
    for i in 0..11 {
        store.add_violation(
            3,
            tariff(10 + i, &format!("VIOLATION {}", i + 1), "100.00", None, None),
            1,
        );
    }

    store
}

pub fn test_state(store: Arc<InMemoryStore>, enforce: bool) -> AppState {
    init_tracing();
    AppState::new(
        store,
        ReceiptRenderer::new(REFERENCE_LAYOUT, None),
        CapabilityPolicy { enforce },
    )
}
