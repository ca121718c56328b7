use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use fredgate_core::{FetchError, TranscodeError, ValidationError};
use fredgate_keystore::StoreError;

/// Terminal request errors, each mapping to exactly one response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// JSON error body: `{"code": ..., "message": ...}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Credential(StoreError::InvalidCredential) => StatusCode::UNAUTHORIZED,
            Self::Credential(StoreError::QuotaExceeded) => StatusCode::TOO_MANY_REQUESTS,
            Self::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Fetch(FetchError::Upstream { status, .. }) => {
                // Pass the upstream status through when it is itself an HTTP
                // error status; anything else reports as a bad gateway.
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|code| code.is_client_error() || code.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Fetch(FetchError::Transport { .. }) => StatusCode::BAD_GATEWAY,
            Self::Fetch(FetchError::Malformed { .. }) | Self::Transcode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(error) => error.code(),
            Self::Credential(error) => error.code(),
            Self::Fetch(error) => error.code(),
            Self::Transcode(_) => "transcode.error",
        }
    }

    fn message(&self) -> String {
        match self {
            // The upstream body is carried verbatim so callers can
            // distinguish transient from permanent upstream failure.
            Self::Fetch(FetchError::Upstream { body, .. }) => body.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dataset_maps_to_400() {
        let error = ApiError::Validation(ValidationError::InvalidDataset {
            value: String::from("gibberish"),
        });
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "request.invalid_dataset");
    }

    #[test]
    fn credential_errors_map_to_401_and_429() {
        assert_eq!(
            ApiError::Credential(StoreError::InvalidCredential).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Credential(StoreError::QuotaExceeded).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn upstream_error_status_passes_through() {
        let error = ApiError::Fetch(FetchError::Upstream {
            status: 503,
            body: String::from("unavailable"),
        });
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.message(), "unavailable");
    }

    #[test]
    fn non_error_upstream_status_reports_bad_gateway() {
        let error = ApiError::Fetch(FetchError::Upstream {
            status: 302,
            body: String::new(),
        });
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn transport_failure_reports_bad_gateway() {
        let error = ApiError::Fetch(FetchError::Transport {
            message: String::from("connection refused"),
        });
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }
}
