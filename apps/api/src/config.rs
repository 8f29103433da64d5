//! Application configuration loading from environment variables.
//!
//! All configuration is loaded from the environment at startup via standard `std::env::var`
//! (after `.env` has been applied by `dotenvy`). Every variable has a default, so the server
//! starts with no configuration at all and stores uploads under `./public`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info,upload_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `UPLOAD_ROOT`: Parent directory of the default destinations (default: "./public")
//! - `RESUME_UPLOAD_DIR`: Where resumes are written (default: "$UPLOAD_ROOT/resume")
//! - `PROFILE_UPLOAD_DIR`: Where profile images are written (default: "$UPLOAD_ROOT/profile")
//! - `PUBLIC_URL_PREFIX`: First segment of returned URLs (default: "host")
//! - `MAX_UPLOAD_BYTES`: Size ceiling per file (default: 5242880)
//! - `UPLOAD_IDLE_TIMEOUT_SECS`: Max wait for the next body chunk, 0 disables (default: 30)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins, empty allows any (default: empty)

use crate::domain::upload::{
    CategoryRules, UploadCategory, UploadPolicy, policy::DEFAULT_MAX_UPLOAD_BYTES,
};
use std::{path::PathBuf, time::Duration};

/// Room for multipart framing on top of the file itself.
pub const BODY_LIMIT_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Destination directory for resumes
    pub resume_upload_dir: PathBuf,

    /// Destination directory for profile images
    pub profile_upload_dir: PathBuf,

    /// URL prefix under which the static file server exposes the upload directories
    pub public_url_prefix: String,

    /// Hard ceiling on the size of one uploaded file, in bytes
    pub max_upload_bytes: u64,

    /// Seconds to wait for the next chunk of an upload body; 0 waits forever
    pub upload_idle_timeout_secs: u64,

    /// Origins allowed by CORS; empty means any
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_upload_root(PathBuf::from("./public"))
    }
}

impl Config {
    /// Defaults, with both destinations placed under `root`.
    pub fn with_upload_root(root: PathBuf) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            resume_upload_dir: root.join(UploadCategory::Resume.folder()),
            profile_upload_dir: root.join(UploadCategory::Profile.folder()),
            public_url_prefix: "host".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_idle_timeout_secs: 30,
            allowed_origins: Vec::new(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let root: PathBuf = env_or("UPLOAD_ROOT", PathBuf::from("./public"))?;
        let defaults = Self::with_upload_root(root);

        let config = Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            resume_upload_dir: env_or("RESUME_UPLOAD_DIR", defaults.resume_upload_dir)?,
            profile_upload_dir: env_or("PROFILE_UPLOAD_DIR", defaults.profile_upload_dir)?,
            public_url_prefix: env_or("PUBLIC_URL_PREFIX", defaults.public_url_prefix)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            upload_idle_timeout_secs: env_or(
                "UPLOAD_IDLE_TIMEOUT_SECS",
                defaults.upload_idle_timeout_secs,
            )?,
            allowed_origins: parse_list(&env_or("ALLOWED_ORIGINS", String::new())?),
        };

        if config.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        Ok(config)
    }

    /// Limits and destinations handed to the upload use case.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.max_upload_bytes,
            public_prefix: self.public_url_prefix.clone(),
            resume: CategoryRules::with_defaults(
                UploadCategory::Resume,
                self.resume_upload_dir.clone(),
            ),
            profile: CategoryRules::with_defaults(
                UploadCategory::Profile,
                self.profile_upload_dir.clone(),
            ),
        }
    }

    /// Ceiling on the whole request body of an upload route.
    pub fn request_body_limit(&self) -> usize {
        let limit = self.max_upload_bytes.saturating_add(BODY_LIMIT_OVERHEAD_BYTES);
        usize::try_from(limit).unwrap_or(usize::MAX)
    }

    pub fn upload_idle_timeout(&self) -> Option<Duration> {
        (self.upload_idle_timeout_secs > 0)
            .then(|| Duration::from_secs(self.upload_idle_timeout_secs))
    }
}

/// Load an environment variable with a default value.
///
/// Returns the parsed environment variable if set, otherwise returns the default.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
