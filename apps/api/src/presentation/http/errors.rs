//! HTTP error handling and response conversion.
//!
//! Upload failures are mapped to a status code, a client-facing JSON message
//! and a stable `x-error-kind` header. Internal detail (filesystem errors,
//! panics) is logged and never echoed to the client.

use crate::domain::upload::{UploadCategory, UploadError};
use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Header carrying the machine-readable error class.
pub const ERROR_KIND_HEADER: &str = "x-error-kind";

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// The request carried no file part (400).
    NoFile,

    /// Declared MIME type is not allowed for the category (400).
    InvalidType(UploadCategory),

    /// File exceeded the size ceiling (400).
    TooLarge,

    /// The multipart body could not be decoded (400).
    Decode(String),

    /// Storage/file operation failed (500).
    Storage(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => write!(f, "No file uploaded"),
            Self::InvalidType(category) => write!(f, "Invalid type for {} upload", category),
            Self::TooLarge => write!(f, "File too large"),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::InvalidType(_) | Self::TooLarge | Self::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::InvalidType(_) => "invalid_type",
            Self::TooLarge => "too_large",
            Self::Decode(_) => "decode_failure",
            Self::Storage(_) => "storage_failure",
            Self::Internal(_) => "internal",
        }
    }

    /// Get a user-safe error message (without implementation details).
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFile => "No file uploaded".into(),
            Self::InvalidType(UploadCategory::Resume) => {
                "Invalid format. Only PDF files are allowed.".into()
            }
            Self::InvalidType(UploadCategory::Profile) => {
                "Invalid format. Only JPG and PNG images are allowed.".into()
            }
            Self::TooLarge => "File upload error: File too large".into(),
            Self::Decode(msg) => format!("File upload error: {}", msg),
            Self::Storage(_) => "Server error during file upload".into(),
            Self::Internal(_) => "Error while uploading".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("error={}", self),
            _ => tracing::warn!("error={}", self),
        }

        let mut response = (status, Json(json!({ "message": message }))).into_response();
        response
            .headers_mut()
            .insert(ERROR_KIND_HEADER, HeaderValue::from_static(self.kind()));
        response
    }
}

// === Domain Error Conversion ===

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => AppError::NoFile,
            UploadError::InvalidType { category, .. } => AppError::InvalidType(category),
            UploadError::TooLarge { .. } => AppError::TooLarge,
            UploadError::DecodeFailure(msg) => AppError::Decode(msg),
            UploadError::StorageFailure(msg) => AppError::Storage(msg),
        }
    }
}

/// Turns a panic caught at the outermost layer into the generic 500 response.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
