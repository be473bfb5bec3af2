//! Platform Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Could not find {entity_type}: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Conflict occurred attempting to store {entity_type}: {message}")]
    Conflict { entity_type: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type: entity_type.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_name(entity_type: &str, name: &str) -> Self {
        Self::conflict(entity_type, format!("Duplicate name, {}.", name))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PlatformError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlatformError::Conflict { .. } => StatusCode::CONFLICT,
            PlatformError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlatformError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            PlatformError::NotFound { .. } => "Not Found",
            PlatformError::Conflict { .. } => "Conflict",
            PlatformError::Validation { .. } => "Bad Request",
            PlatformError::Internal { .. } => "Internal Server Error",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body: `{"error": {"code", "title", "message"}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: u16,
    pub title: String,
    pub message: String,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: status.as_u16(),
                title: self.title().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
