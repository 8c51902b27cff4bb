//! Human-readable failure page for browser-facing receipt routes.

use axum::response::{Html, IntoResponse, Response};

use crate::receipt::ReceiptError;

fn guidance(err: &ReceiptError) -> &'static str {
    match err {
        ReceiptError::BadInput(_) => "Check the receipt number and try again.",
        ReceiptError::Forbidden(_) => "Ask an administrator for access to payment records.",
        ReceiptError::Unavailable(_) => {
            "The records database could not be reached. Please try again in a few minutes."
        }
        ReceiptError::NotFound(_) => "No printable receipt exists for this payment.",
        ReceiptError::Internal(_) => "The receipt could not be generated. Please try again.",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl IntoResponse for ReceiptError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Receipt error</title>\n</head>\n<body>\n\
             <h1>{}</h1>\n<p>{}</p>\n<p><a href=\"javascript:history.back()\">Go back</a></p>\n\
             </body>\n</html>\n",
            escape(self.message()),
            guidance(&self),
        );

        (status, Html(body)).into_response()
    }
}
