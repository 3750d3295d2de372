//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with an HTTP status and the
//! `errno` the admin UI switches on.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mallctl_core::{codes, ValidationError};
use serde_json::json;

use crate::service::GoodsError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body or query string could not be decoded (400)
    BadRequest { message: String },

    /// Goods name already used by a live record (409)
    NameExists { name: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Store failure (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NameExists { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn errno(&self) -> i32 {
        match self {
            Self::Validation(e) => e.errno(),
            Self::BadRequest { .. } => codes::BAD_ARGUMENT,
            Self::NameExists { .. } => codes::GOODS_NAME_EXIST,
            Self::NotFound { .. } => codes::FAIL,
            Self::Internal { .. } => codes::UPDATE_DATA_FAILED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errno = self.errno();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "errno": errno,
                "message": e.to_string(),
                "field": e.field(),
            }),
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "errno": errno,
                "message": message,
            }),
            Self::NameExists { name } => json!({
                "error": "goods_name_exists",
                "errno": errno,
                "message": format!("goods name '{}' already exists", name),
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "errno": errno,
                "message": format!("{} '{}' not found", resource, id),
            }),
            Self::Internal { message } => {
                // Log the actual error, return generic message
                tracing::error!("Internal error: {}", message);
                json!({
                    "error": "internal_error",
                    "errno": errno,
                    "message": "an internal error occurred",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<GoodsError> for ApiError {
    fn from(e: GoodsError) -> Self {
        match e {
            GoodsError::Validation(e) => Self::Validation(e),
            GoodsError::NameExists(name) => Self::NameExists { name },
            GoodsError::NotFound { resource, id } => Self::NotFound { resource, id },
            GoodsError::Store(e) => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest {
            message: e.body_text(),
        }
    }
}
