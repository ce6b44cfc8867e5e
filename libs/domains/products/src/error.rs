use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub const INVALID_ID_MESSAGE: &str = "Invalid product ID format";

#[derive(Debug, Error)]
pub enum ProductError {
    /// One message per offending field, in field order
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Malformed product id: {0}")]
    MalformedId(String),

    #[error("Product with id {0} not found")]
    NotFound(Uuid),

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProductError::Validation(vec![message.into()])
    }

    /// Convert to an HTTP error; storage failures are reported as `action` with the cause in `details`
    pub fn into_app_error(self, action: &str) -> AppError {
        match self {
            ProductError::Validation(messages) => AppError::validation(messages),
            ProductError::MalformedId(_) => AppError::BadRequest(INVALID_ID_MESSAGE.to_string()),
            ProductError::NotFound(id) => {
                AppError::NotFound(format!("Product with id {id} not found"))
            }
            ProductError::InsufficientStock {
                available,
                requested,
            } => AppError::Validation {
                message: "Insufficient stock".to_string(),
                details: json!({ "available": available, "requested": requested }),
            },
            ProductError::Database(details) => AppError::Database {
                message: action.to_string(),
                details,
            },
            ProductError::Internal(details) => AppError::Internal {
                message: action.to_string(),
                details,
            },
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        err.into_app_error("Failed to process product request")
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
