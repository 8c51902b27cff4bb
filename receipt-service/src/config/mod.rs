//! Configuration module for receipt-service.

use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub receipt: ReceiptSettings,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ReceiptSettings {
    /// Background image of the printed form, painted under the fields.
    pub template_path: Option<PathBuf>,
    /// Require the payment-viewing capability header on receipt routes.
    pub enforce_capabilities: bool,
}

impl ReceiptConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let enforce_capabilities = env::var("ENFORCE_CAPABILITIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);
        if common.is_production() && !enforce_capabilities {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ENFORCE_CAPABILITIES cannot be disabled in production"
            )));
        }

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "receipt-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            },
            receipt: ReceiptSettings {
                template_path: env::var("RECEIPT_TEMPLATE_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                enforce_capabilities,
            },
        })
    }
}
