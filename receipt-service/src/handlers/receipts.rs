use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

use crate::middleware::PaymentViewer;
use crate::models::ReceiptDocument;
use crate::receipt::error::{
    ReceiptError, MSG_GENERATION_FAILED, MSG_INVALID_RECEIPT, MSG_RECEIPT_REQUIRED,
};
use crate::services::metrics::{
    DOCUMENTS_TOTAL, ERRORS_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReceiptQuery {
    #[serde(default)]
    pub receipt_number: Option<String>,
}

type QueryResult = Result<Query<ReceiptQuery>, QueryRejection>;

fn record(route: &str, response: &Response) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[route, response.status().as_str()])
        .inc();
}

fn count_failure(err: &ReceiptError) {
    ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
    DOCUMENTS_TOTAL.with_label_values(&["failed"]).inc();
}

async fn build_document(
    state: &AppState,
    viewer: Result<PaymentViewer, ReceiptError>,
    query: QueryResult,
) -> Result<ReceiptDocument, ReceiptError> {
    let viewer = viewer?;
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Malformed receipt query");
        ReceiptError::BadInput(MSG_INVALID_RECEIPT.to_string())
    })?;
    let receipt_number = query
        .receipt_number
        .ok_or_else(|| ReceiptError::BadInput(MSG_RECEIPT_REQUIRED.to_string()))?;

    tracing::info!(
        user_id = viewer.user_id.as_deref().unwrap_or("-"),
        receipt_number = %receipt_number,
        "Receipt requested"
    );

    state.aggregator.build(&receipt_number).await
}

async fn generate_pdf(
    state: &AppState,
    viewer: Result<PaymentViewer, ReceiptError>,
    query: QueryResult,
) -> Result<(String, Vec<u8>), ReceiptError> {
    let document = build_document(state, viewer, query).await?;
    let file_name = document.file_name();
    let renderer = state.renderer.clone();

    let bytes = tokio::task::spawn_blocking(move || renderer.render(&document))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Receipt render task failed");
            ReceiptError::Internal(MSG_GENERATION_FAILED.to_string())
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Receipt render failed");
            ReceiptError::Internal(MSG_GENERATION_FAILED.to_string())
        })?;

    DOCUMENTS_TOTAL.with_label_values(&["rendered"]).inc();
    Ok((file_name, bytes))
}

/// Render the receipt PDF inline for printing.
///
/// Failures come back as an HTML page with the matching status code and no
/// document bytes.
pub async fn print_receipt(
    State(state): State<AppState>,
    viewer: Result<PaymentViewer, ReceiptError>,
    query: QueryResult,
) -> Response {
    let timer = HTTP_REQUEST_DURATION
        .with_label_values(&["print"])
        .start_timer();

    let response = match generate_pdf(&state, viewer, query).await {
        Ok((file_name, bytes)) => {
            tracing::info!(file_name = %file_name, size = bytes.len(), "Receipt PDF generated");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("inline; filename=\"{}\"", file_name),
                    ),
                    (header::CACHE_CONTROL, "no-store".to_string()),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), message = %e, "Receipt PDF not generated");
            count_failure(&e);
            e.into_response()
        }
    };

    record("print", &response);
    timer.observe_duration();
    response
}

/// JSON projection of the receipt for the admin pages.
pub async fn preview_receipt(
    State(state): State<AppState>,
    viewer: Result<PaymentViewer, ReceiptError>,
    query: QueryResult,
) -> Response {
    let timer = HTTP_REQUEST_DURATION
        .with_label_values(&["preview"])
        .start_timer();

    let response = match build_document(&state, viewer, query).await {
        Ok(document) => Json(document).into_response(),
        Err(e) => {
            count_failure(&e);
            AppError::from(e).into_response()
        }
    };

    record("preview", &response);
    timer.observe_duration();
    response
}
