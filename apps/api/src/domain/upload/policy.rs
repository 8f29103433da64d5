use std::path::{Path, PathBuf};

use super::category::UploadCategory;

/// Reference ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Where files of one category go and which MIME types they may declare.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub destination: PathBuf,
    pub allowed_mime_types: Vec<String>,
}

impl CategoryRules {
    pub fn with_defaults(category: UploadCategory, destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            allowed_mime_types: category
                .default_mime_types()
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Limits and destinations applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub public_prefix: String,
    pub resume: CategoryRules,
    pub profile: CategoryRules,
}

impl UploadPolicy {
    /// Default allow-lists with `<root>/resume` and `<root>/profile` as destinations.
    pub fn under_root(root: &Path, max_bytes: u64, public_prefix: impl Into<String>) -> Self {
        Self {
            max_bytes,
            public_prefix: public_prefix.into(),
            resume: CategoryRules::with_defaults(
                UploadCategory::Resume,
                root.join(UploadCategory::Resume.folder()),
            ),
            profile: CategoryRules::with_defaults(
                UploadCategory::Profile,
                root.join(UploadCategory::Profile.folder()),
            ),
        }
    }

    pub fn rules(&self, category: UploadCategory) -> &CategoryRules {
        match category {
            UploadCategory::Resume => &self.resume,
            UploadCategory::Profile => &self.profile,
        }
    }

    pub fn destination(&self, category: UploadCategory) -> &Path {
        &self.rules(category).destination
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        UploadCategory::ALL
            .into_iter()
            .map(move |category| self.destination(category))
    }

    /// Compares the MIME essence, ignoring parameters and ASCII case.
    pub fn accepts(&self, category: UploadCategory, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        self.rules(category)
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}
