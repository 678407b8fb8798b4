use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;

/// Room metrics followed by the default process metrics, in the text exposition format.
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let mut metric_families = REGISTRY.gather();
    metric_families.extend(prometheus::gather());

    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        log::error!("Could not encode metrics. Error: '{error}'.");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match String::from_utf8(buffer) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            body,
        )
            .into_response(),
        Err(error) => {
            log::error!("Metrics are not valid UTF-8. Error: '{error}'.");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
