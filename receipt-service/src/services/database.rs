//! PostgreSQL storage for receipt-service.

use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{
    Citation, Payment, PaymentMethod, PaymentRecord, ViolationOccurrence, ViolationTypeTariff,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::{ReceiptStore, StoreError};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    payment_id: i64,
    citation_id: i64,
    receipt_number: String,
    amount_paid: Decimal,
    payment_method: String,
    payment_date: String,
    reference_number: Option<String>,
    ticket_number: String,
    driver_first_name: String,
    driver_last_name: String,
    total_fine: Decimal,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentRecord {
            payment: Payment {
                payment_id: row.payment_id,
                citation_id: row.citation_id,
                receipt_number: row.receipt_number,
                amount_paid: row.amount_paid,
                payment_method: PaymentMethod::from_string(&row.payment_method),
                payment_date: row.payment_date,
                reference_number: row.reference_number,
            },
            citation: Citation {
                citation_id: row.citation_id,
                ticket_number: row.ticket_number,
                driver_first_name: row.driver_first_name,
                driver_last_name: row.driver_last_name,
                total_fine: row.total_fine,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct ViolationRow {
    violation_id: i64,
    citation_id: i64,
    offense_count: i32,
    violation_type_id: i64,
    label: String,
    fine_first: Decimal,
    fine_second: Option<Decimal>,
    fine_third: Option<Decimal>,
}

impl From<ViolationRow> for ViolationOccurrence {
    fn from(row: ViolationRow) -> Self {
        ViolationOccurrence {
            violation_id: row.violation_id,
            citation_id: row.citation_id,
            offense_count: row.offense_count,
            tariff: ViolationTypeTariff {
                violation_type_id: row.violation_type_id,
                label: row.label,
                first_offense: row.fine_first,
                second_offense: row.fine_second,
                third_offense: row.fine_third,
            },
        }
    }
}

/// Classify a driver error as an outage or a query failure.
fn classify(context: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            StoreError::Unavailable(anyhow::anyhow!("{}: {}", context, err))
        }
        _ => StoreError::Query(anyhow::anyhow!("{}: {}", context, err)),
    }
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "receipt-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl ReceiptStore for Database {
    #[instrument(skip(self), fields(receipt_number = %receipt_number))]
    async fn find_payment_with_citation(
        &self,
        receipt_number: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_payment_with_citation"])
            .start_timer();

        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT p.payment_id, p.citation_id, p.receipt_number, p.amount_paid, p.payment_method,
                   p.payment_date::text AS payment_date, p.reference_number,
                   c.ticket_number, c.driver_first_name, c.driver_last_name, c.total_fine
            FROM payments p
            JOIN citations c ON c.citation_id = p.citation_id
            WHERE p.receipt_number = $1
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify("Failed to get payment", e))?;

        timer.observe_duration();

        Ok(row.map(PaymentRecord::from))
    }

    #[instrument(skip(self), fields(citation_id = citation_id))]
    async fn find_violations_with_tariff(
        &self,
        citation_id: i64,
    ) -> Result<Vec<ViolationOccurrence>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_violations_with_tariff"])
            .start_timer();

        let rows = sqlx::query_as::<_, ViolationRow>(
            r#"
            SELECT cv.violation_id, cv.citation_id, cv.offense_count,
                   vt.violation_type_id, vt.label, vt.fine_first, vt.fine_second, vt.fine_third
            FROM citation_violations cv
            JOIN violation_types vt ON vt.violation_type_id = cv.violation_type_id
            WHERE cv.citation_id = $1
            ORDER BY cv.violation_id
            "#,
        )
        .bind(citation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("Failed to list violations", e))?;

        timer.observe_duration();

        Ok(rows.into_iter().map(ViolationOccurrence::from).collect())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| classify("Health check failed", e))?;
        Ok(())
    }
}
