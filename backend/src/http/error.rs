//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::services::QueryKind;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// A newer query of the same kind started before this one finished
    Superseded(QueryKind),
    /// Error from the analysis core
    Analysis(AnalysisError),
}

fn analysis_response(err: AnalysisError) -> (StatusCode, ApiError) {
    let (status, code) = match &err {
        AnalysisError::FormatError { .. } => (StatusCode::BAD_REQUEST, "FORMAT_ERROR"),
        AnalysisError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
        AnalysisError::UnknownMetric { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_METRIC"),
        AnalysisError::MissingColumnError { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_COLUMN")
        }
        AnalysisError::LoadError { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "LOAD_ERROR"),
        AnalysisError::ConfigurationError { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
        }
    };

    let context = err.context().to_string();
    let mut body = ApiError::new(code, err.to_string());
    if !context.is_empty() {
        body = body.with_details(context);
    }
    (status, body)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Superseded(kind) => (
                StatusCode::CONFLICT,
                ApiError::new("SUPERSEDED", "a newer query replaced this one")
                    .with_details(format!("{:?}", kind)),
            ),
            AppError::Analysis(e) => analysis_response(e),
        };

        (status, Json(error)).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorContext;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AnalysisError::unknown_metric("x"), StatusCode::BAD_REQUEST),
            (
                AnalysisError::invalid_range("bad", ErrorContext::new("window")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AnalysisError::missing_column("edge_speed", ErrorContext::default()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AnalysisError::configuration("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
        assert_eq!(
            AppError::Superseded(QueryKind::Map).into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_details_carry_context() {
        let (_, body) = analysis_response(AnalysisError::invalid_range(
            "bad",
            ErrorContext::new("tokens_in_range"),
        ));
        assert_eq!(body.code, "INVALID_RANGE");
        assert_eq!(body.details.as_deref(), Some("[operation=tokens_in_range]"));
    }
}
