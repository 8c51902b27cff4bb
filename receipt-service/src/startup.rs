//! Application startup and lifecycle management.

use axum::extract::FromRef;
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ReceiptConfig;
use crate::handlers;
use crate::middleware::CapabilityPolicy;
use crate::receipt::{ReceiptAggregator, ReceiptRenderer, REFERENCE_LAYOUT};
use crate::services::{init_metrics, Database, ReceiptStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReceiptStore>,
    pub aggregator: ReceiptAggregator,
    pub renderer: Arc<ReceiptRenderer>,
    pub capability_policy: CapabilityPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReceiptStore>,
        renderer: ReceiptRenderer,
        capability_policy: CapabilityPolicy,
    ) -> Self {
        Self {
            aggregator: ReceiptAggregator::new(store.clone()),
            store,
            renderer: Arc::new(renderer),
            capability_policy,
        }
    }
}

impl FromRef<AppState> for CapabilityPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.capability_policy
    }
}

/// HTTP routes for the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/receipts/print", get(handlers::print_receipt))
        .route("/receipts/preview", get(handlers::preview_receipt))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ReceiptConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    /// Use this when the schema is managed outside the service.
    pub async fn build_without_migrations(config: ReceiptConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: ReceiptConfig, run_migrations: bool) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;

        if run_migrations {
            db.run_migrations().await?;
        }

        match &config.receipt.template_path {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "Using receipt template");
            }
            Some(path) => {
                tracing::warn!(path = %path.display(), "Receipt template not found, receipts will print without it");
            }
            None => tracing::info!("No receipt template configured"),
        }

        let renderer = ReceiptRenderer::new(REFERENCE_LAYOUT, config.receipt.template_path.clone());
        let policy = CapabilityPolicy {
            enforce: config.receipt.enforce_capabilities,
        };
        if !policy.enforce {
            tracing::warn!("Capability enforcement disabled - trusting all callers");
        }

        let state = AppState::new(Arc::new(db), renderer, policy);

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Receipt service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: router(state),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
