use thiserror::Error;

use super::category::UploadCategory;

/// Why an upload was refused.
///
/// `StorageFailure` carries internal detail for logs only; the HTTP layer
/// replaces it with a generic message before anything reaches the client.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("File too large")]
    TooLarge { limit_bytes: u64 },

    #[error("Invalid content type {content_type:?} for {category} upload")]
    InvalidType {
        category: UploadCategory,
        content_type: Option<String>,
    },

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("{0}")]
    DecodeFailure(String),
}

impl UploadError {
    /// Stable identifier of the failure class, safe to expose to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::TooLarge { .. } => "too_large",
            Self::InvalidType { .. } => "invalid_type",
            Self::StorageFailure(_) => "storage_failure",
            Self::DecodeFailure(_) => "decode_failure",
        }
    }

    pub(crate) fn storage(context: &str, err: std::io::Error) -> Self {
        Self::StorageFailure(format!("{}: {}", context, err))
    }
}
