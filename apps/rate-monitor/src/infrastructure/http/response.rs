//! HTTP response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::rate_aggregation::StoreError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ApiErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Store failure mapped onto an HTTP response.
#[derive(Debug)]
pub struct StoreErrorResponse(pub StoreError);

impl From<StoreError> for StoreErrorResponse {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for StoreErrorResponse {
    fn into_response(self) -> Response {
        match &self.0 {
            StoreError::NotFound { symbol } => {
                tracing::info!(symbol = %symbol, "Unknown currency requested");
                (
                    StatusCode::NOT_FOUND,
                    Json(ApiErrorResponse::new(
                        "NOT_FOUND",
                        format!("Unknown currency: {symbol}"),
                    )),
                )
                    .into_response()
            }
            StoreError::Persist { .. } => {
                tracing::warn!(error = %self.0, "Request failed on store");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ApiErrorResponse::new(
                        "STORE_UNAVAILABLE",
                        "Rates are temporarily unavailable",
                    )),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::domain::rate_aggregation::StoreOperation;
    use crate::domain::shared::Symbol;

    /// Log sink shared with a scoped subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logs_of(err: StoreError) -> (StatusCode, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let status = tracing::subscriber::with_default(subscriber, || {
            StoreErrorResponse(err).into_response().status()
        });
        let text = String::from_utf8_lossy(&logs.0.lock()).into_owned();
        (status, text)
    }

    #[test]
    fn not_found_is_logged() {
        let (status, logs) = logs_of(StoreError::NotFound {
            symbol: Symbol::new("DOGE"),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(logs.contains("Unknown currency requested"), "{logs}");
        assert!(logs.contains("DOGE"), "{logs}");
    }

    #[test]
    fn persist_failure_is_logged() {
        let (status, logs) = logs_of(StoreError::persist(
            StoreOperation::Read,
            Some(&Symbol::new("BTC")),
            "connection reset",
        ));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(logs.contains("Request failed on store"), "{logs}");
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = StoreErrorResponse(StoreError::NotFound {
            symbol: Symbol::new("BTC"),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn persist_maps_to_503() {
        let response = StoreErrorResponse(StoreError::persist(
            StoreOperation::ReadAll,
            None,
            "pool timed out",
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
