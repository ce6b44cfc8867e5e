//! JSON response envelope shared by every endpoint.
//!
//! Successful reads look like `{ "success": true, "data": ... }`, listings add
//! `count`, `total` and `pagination`, and failures carry `error` plus optional
//! `details`. Absent parts are omitted from the body.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Offset pagination echoed back on list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub limit: u64,
    pub skip: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            total: None,
            pagination: None,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// `{ success, count, data }` for unpaginated collections
    pub fn collection(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }

    /// `{ success, count, total, pagination, data }` for one page of a filtered listing
    pub fn page(items: Vec<T>, total: u64, pagination: PageInfo) -> Self {
        Self {
            total: Some(total),
            pagination: Some(pagination),
            ..Self::collection(items)
        }
    }
}

impl Envelope<()> {
    /// Success without a payload, e.g. after a delete
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            total: None,
            pagination: None,
            data: None,
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            message: None,
            count: None,
            total: None,
            pagination: None,
            data: None,
            error: Some(error.into()),
            details,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
