//! Reusable OpenAPI response types for failure envelopes.

use serde::Serialize;
#[allow(unused_imports)]
use serde_json::json;
use serde_json::Value;
use utoipa::{ToResponse, ToSchema};

/// Body of every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`
    pub success: bool,
    pub error: String,
    /// Per-field messages, or the underlying cause of a server error
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "error": "Failed to fetch products",
        "details": "server selection timeout"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "error": "Validation failed",
        "details": [
            "Name must be at least 2 characters",
            "Price cannot be negative"
        ]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid ID",
    content_type = "application/json",
    example = json!({
        "success": false,
        "error": "Invalid product ID format"
    })
)]
pub struct BadRequestIdResponse(pub ErrorEnvelope);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "error": "Product with id 0190c7a2-8a4e-7b3c-9d1e-2f3a4b5c6d7e not found"
    })
)]
pub struct NotFoundResponse(pub ErrorEnvelope);
