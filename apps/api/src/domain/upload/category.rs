use std::fmt;

/// The kind of file being uploaded.
///
/// Chosen by the route that received the request, never inferred from the
/// request body. Decides where the file lands, which MIME types are accepted
/// and which folder appears in the public URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    Resume,
    Profile,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 2] = [UploadCategory::Resume, UploadCategory::Profile];

    /// Folder name used both on disk (under the upload root) and in public URLs.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Profile => "profile",
        }
    }

    /// MIME types accepted when no override is configured.
    pub fn default_mime_types(self) -> &'static [&'static str] {
        match self {
            Self::Resume => &["application/pdf"],
            Self::Profile => &["image/jpeg", "image/png"],
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}
