use std::fmt;
use uuid::Uuid;

/// Name under which an upload is written to disk.
///
/// A random UUID v4 followed by the extension of the client-supplied name, case
/// preserved. The client's base name never reaches the filesystem. Extensions
/// holding anything but ASCII letters and digits are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredFileName(String);

impl StoredFileName {
    pub fn generate(original_name: Option<&str>) -> Self {
        let id = Uuid::new_v4();
        match original_name.and_then(extension_of) {
            Some(ext) => Self(format!("{}.{}", id, ext)),
            None => Self(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extension of the last path segment, without the dot.
///
/// Browsers on Windows sometimes send the full client path, so both separators
/// are honoured. A leading dot alone (`.bashrc`) is not an extension.
fn extension_of(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let dot = base.rfind('.')?;
    if dot == 0 {
        return None;
    }
    let ext = &base[dot + 1..];
    ext.chars().all(|c| c.is_ascii_alphanumeric()).then_some(ext)
}
