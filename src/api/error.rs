/// API error type
/// 
/// Every failure leaves the API as `{ "success": false, "error": ..., "message"?: ... }`
/// with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Errors returned by catalog handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(&'static str),
    /// Unknown resource (404)
    #[error("{0}")]
    NotFound(&'static str),
    /// Storage or other internal failure (500)
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Wrap an internal failure with a client-facing summary
    pub fn internal(context: &'static str, source: anyhow::Error) -> Self {
        Self::Internal { context, source }
    }

    /// HTTP status returned for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest(error) | Self::NotFound(error) => json!({
                "success": false,
                "error": error,
            }),
            Self::Internal { context, source } => {
                tracing::error!("❌ {}: {:#}", context, source);
                json!({
                    "success": false,
                    "error": context,
                    "message": source.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(ApiError::BadRequest("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("Failed", anyhow::anyhow!("disk full")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_display_includes_context() {
        let error = ApiError::internal("Failed to fetch workflows", anyhow::anyhow!("locked"));
        assert_eq!(error.to_string(), "Failed to fetch workflows: locked");
    }
}
