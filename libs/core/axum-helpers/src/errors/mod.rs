pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use crate::envelope::Envelope;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

pub const VALIDATION_FAILED: &str = "Validation failed";

/// Application error type rendered as a failure [`Envelope`].
///
/// Client-facing variants carry the exact `error` text the caller sees.
/// Server-side variants carry a caller-facing summary in `message` and the
/// underlying cause in `details`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// 400 with a list or object of details
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("{message}: {details}")]
    Database { message: String, details: String },

    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

impl AppError {
    pub fn validation(details: Vec<String>) -> Self {
        Self::Validation {
            message: VALIDATION_FAILED.to_string(),
            details: json!(details),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::JsonExtractorRejection(_)
            | Self::ValidationError(_)
            | Self::Validation { .. }
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                Envelope::failure(VALIDATION_FAILED, Some(json!([e.body_text()])))
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                Envelope::failure(VALIDATION_FAILED, Some(json!(validation_messages(&e))))
            }
            AppError::Validation { message, details } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    %details,
                    "{}",
                    message
                );
                Envelope::failure(message, Some(details))
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                Envelope::failure(msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                Envelope::failure(msg, None)
            }
            AppError::Database { message, details } => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    %details,
                    "{}",
                    message
                );
                Envelope::failure(message, Some(Value::String(details)))
            }
            AppError::Internal { message, details } => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    %details,
                    "{}",
                    message
                );
                Envelope::failure(message, Some(Value::String(details)))
            }
        };

        (status, body).into_response()
    }
}

/// Flatten `validator` errors into human-readable messages, sorted by field
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", err.code),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_lists_details() {
        let (status, body) = render(AppError::validation(vec![
            "Product name is required".to_string(),
            "Price cannot be negative".to_string(),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["details"],
            json!(["Product name is required", "Price cannot be negative"])
        );
    }

    #[tokio::test]
    async fn test_not_found_has_no_details() {
        let (status, body) = render(AppError::NotFound("Product with id x not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Product with id x not found"}));
    }

    #[tokio::test]
    async fn test_database_error_is_500_with_cause() {
        let (status, body) = render(AppError::Database {
            message: "Failed to fetch products".into(),
            details: "server selection timeout".into(),
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch products");
        assert_eq!(body["details"], "server selection timeout");
    }

    #[tokio::test]
    async fn test_validator_errors_use_field_messages() {
        #[derive(Validate)]
        struct Reduce {
            #[validate(range(min = 1, message = "Amount must be at least 1"))]
            amount: i64,
        }

        let err = Reduce { amount: 0 }.validate().unwrap_err();
        let (status, body) = render(AppError::from(err)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!(["Amount must be at least 1"]));
    }
}
