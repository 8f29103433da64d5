use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::{category::UploadCategory, value_objects::StoredFileName};

/// A file that was fully written to its destination directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub category: UploadCategory,
    pub file_name: StoredFileName,
    pub path: PathBuf,
    /// Public path, `/<prefix>/<category folder>/<file name>`.
    pub url: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub stored_at: DateTime<Utc>,
}

/// Builds the public URL path for a stored file.
pub fn public_url(prefix: &str, category: UploadCategory, file_name: &StoredFileName) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{}/{}", category.folder(), file_name)
    } else {
        format!("/{}/{}/{}", prefix, category.folder(), file_name)
    }
}
