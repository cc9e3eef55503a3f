use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::CompileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            // The compiler log is what the caller needs to fix their input.
            AppError::Compile(CompileError::Failure { pass, log }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LATEX_COMPILATION_FAILED",
                format!("pass {pass}: {log}"),
            ),
            AppError::Compile(CompileError::Timeout(limit)) => (
                StatusCode::GATEWAY_TIMEOUT,
                "LATEX_TIMEOUT",
                format!("LaTeX compilation exceeded {}s", limit.as_secs()),
            ),
            AppError::Compile(e) => {
                tracing::error!("Compile error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Document generation failed".to_string(),
                )
            }
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
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Compile(CompileError::Failure {
                    pass: 1,
                    log: "boom".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Compile(CompileError::Timeout(Duration::from_secs(30))),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::Compile(CompileError::MissingArtifact("a.pdf".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Compile(CompileError::NameExhausted(1000)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
