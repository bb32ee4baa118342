use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Why the semantic-judgment collaborator could not produce a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorFailure {
    /// Transport failure, rate limit, or upstream error status.
    Unavailable,
    /// The collaborator answered, but the payload could not be parsed or is inconsistent.
    MalformedOutput,
}

/// Error taxonomy of the matching and scoring core.
///
/// Collaborator messages are logged where they occur and never carried here,
/// so nothing upstream-specific can leak into a response body.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Responsibility judgment failed ({kind:?})")]
    Collaborator {
        kind: CollaboratorFailure,
        retryable: bool,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl MatchError {
    pub fn unavailable() -> Self {
        MatchError::Collaborator {
            kind: CollaboratorFailure::Unavailable,
            retryable: true,
        }
    }

    pub fn malformed() -> Self {
        MatchError::Collaborator {
            kind: CollaboratorFailure::MalformedOutput,
            retryable: true,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, MatchError::Collaborator { retryable: true, .. })
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Collaborator unavailable")]
    Collaborator,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Validation(msg) => AppError::Validation(msg),
            MatchError::Collaborator { .. } => AppError::Collaborator,
            MatchError::InvariantViolation(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Collaborator => (
                StatusCode::SERVICE_UNAVAILABLE,
                "COLLABORATOR_UNAVAILABLE",
                "Analysis is temporarily unavailable. Please try again.".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_errors_are_retryable() {
        assert!(MatchError::unavailable().is_retryable());
        assert!(MatchError::malformed().is_retryable());
        assert!(!MatchError::Validation("bad".into()).is_retryable());
        assert!(!MatchError::InvariantViolation("sum".into()).is_retryable());
    }

    #[test]
    fn test_collaborator_error_maps_to_generic_503() {
        let response = AppError::from(MatchError::unavailable()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invariant_violation_maps_to_500() {
        let response =
            AppError::from(MatchError::InvariantViolation("sum mismatch".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::from(MatchError::Validation("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
