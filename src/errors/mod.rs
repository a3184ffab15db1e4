/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("External API error: {0}")]
    ExternalApi(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Malformed upstream body: {0}")]
    Decode(String),

    #[error("No acceptable record after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ExternalApi(e) => match e.status() {
                Some(status) => upstream_code(status.as_u16()),
                None => "UPSTREAM_ERROR",
            },
            ApiError::UpstreamStatus(status) => upstream_code(*status),
            ApiError::Decode(_) => "UPSTREAM_MALFORMED",
            ApiError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

fn upstream_code(status: u16) -> &'static str {
    match status {
        403 => "UPSTREAM_403",
        404 => "UPSTREAM_404",
        429 => "UPSTREAM_429",
        500..=599 => "UPSTREAM_5XX",
        _ => "UPSTREAM_ERROR",
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        // Errors travel in the envelope, the HTTP status stays 200
        (StatusCode::OK, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_codes() {
        assert_eq!(ApiError::UpstreamStatus(403).code(), "UPSTREAM_403");
        assert_eq!(ApiError::UpstreamStatus(404).code(), "UPSTREAM_404");
        assert_eq!(ApiError::UpstreamStatus(429).code(), "UPSTREAM_429");
        assert_eq!(ApiError::UpstreamStatus(503).code(), "UPSTREAM_5XX");
        assert_eq!(ApiError::UpstreamStatus(400).code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_display_messages() {
        let err = ApiError::RetriesExhausted { attempts: 3 };
        assert_eq!(err.to_string(), "No acceptable record after 3 attempts");
        assert_eq!(err.code(), "RETRIES_EXHAUSTED");

        let err = ApiError::InvalidInput("bad date".into());
        assert_eq!(err.to_string(), "Invalid input: bad date");
    }

    #[test]
    fn test_anyhow_becomes_internal() {
        let err: ApiError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "boom"));
    }
}
