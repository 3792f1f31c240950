//! Shared response envelope for API handlers.
//!
//! Every successful API response is `{ "success": true, "message"?: ..., "data": ... }`.
//! Errors use the `{ "success": false, "error", "code" }` shape produced by
//! [`crate::error::AppError`].

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

/// `200 OK` with an envelope.
pub type ApiJson<T> = Json<ApiResponse<T>>;

/// `201 Created` with an envelope.
pub type Created<T> = (StatusCode, Json<ApiResponse<T>>);

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> ApiJson<T> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> ApiJson<T> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data,
        })
    }

    pub fn created(message: impl Into<String>, data: T) -> Created<T> {
        (StatusCode::CREATED, Self::with_message(message, data))
    }
}

/// Envelope for deletes: `data` is `null`.
pub fn deleted(message: impl Into<String>) -> ApiJson<()> {
    ApiResponse::with_message(message, ())
}
