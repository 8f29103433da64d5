use crate::{
    domain::upload::UploadError,
    infrastructure::storage::traits::{ByteStream, FileStorage},
};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

/// Prefix of in-flight files. Hidden so directory listings skip them.
pub const PARTIAL_FILE_PREFIX: &str = ".upload-";
pub const PARTIAL_FILE_SUFFIX: &str = ".part";

/// Writes uploads to the local filesystem.
///
/// Bytes go to a hidden sibling file first and are renamed into place once the
/// whole body has been written and synced, so a reader never sees a truncated
/// file under its final name.
#[derive(Debug, Clone, Default)]
pub struct LocalDiskStorage {
    idle_timeout: Option<Duration>,
}

impl LocalDiskStorage {
    /// `idle_timeout` bounds the wait for each body chunk; `None` waits forever.
    pub fn new(idle_timeout: Option<Duration>) -> Self {
        Self { idle_timeout }
    }

    /// Creates every destination directory that does not exist yet.
    pub async fn ensure_directories<'a>(
        &self,
        dirs: impl IntoIterator<Item = &'a Path>,
    ) -> anyhow::Result<()> {
        for dir in dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                anyhow::anyhow!("Failed to create upload directory {}: {}", dir.display(), e)
            })?;
            tracing::debug!(dir = %dir.display(), "Upload directory ready");
        }
        Ok(())
    }

    async fn next_chunk(
        &self,
        body: &mut ByteStream<'_>,
    ) -> Result<Option<Result<bytes::Bytes, UploadError>>, UploadError> {
        match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, body.next())
                .await
                .map_err(|_| UploadError::DecodeFailure("Request timed out".into())),
            None => Ok(body.next().await),
        }
    }
}

#[async_trait]
impl FileStorage for LocalDiskStorage {
    async fn persist(
        &self,
        dir: &Path,
        file_name: &str,
        body: ByteStream<'_>,
        max_bytes: u64,
    ) -> Result<u64, UploadError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(UploadError::StorageFailure(format!(
                "Refusing to store under file name {:?}",
                file_name
            )));
        }

        let start = Instant::now();
        fs::create_dir_all(dir)
            .await
            .map_err(|e| UploadError::storage(&format!("create {}", dir.display()), e))?;

        let final_path = dir.join(file_name);
        let partial = PartialFile::new(hidden_sibling(dir));

        let written = match self.write_partial(partial.path(), body, max_bytes).await {
            Ok(written) => written,
            Err(e) => {
                if let UploadError::TooLarge { limit_bytes } = &e {
                    tracing::warn!(
                        dir = %dir.display(),
                        limit_bytes,
                        "Upload exceeded size limit, discarding partial file"
                    );
                }
                partial.discard().await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(partial.path(), &final_path).await {
            partial.discard().await;
            return Err(UploadError::storage(
                &format!("rename to {}", final_path.display()),
                e,
            ));
        }
        partial.disarm();

        tracing::info!(
            path = %final_path.display(),
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(written)
    }

    async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed stored upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!("Failed to delete {}: {}", path.display(), e)),
        }
    }

    async fn is_writable(&self, dir: &Path) -> bool {
        let check = hidden_sibling(dir);
        let created = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&check)
            .await;

        match created {
            Ok(file) => {
                drop(file);
                if let Err(e) = fs::remove_file(&check).await {
                    tracing::warn!(path = %check.display(), "Failed to remove write check file: {}", e);
                }
                true
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Upload directory not writable: {}", e);
                false
            }
        }
    }
}

impl LocalDiskStorage {
    /// Copies `body` into a freshly created file at `path`, then syncs it.
    async fn write_partial(
        &self,
        path: &Path,
        mut body: ByteStream<'_>,
        max_bytes: u64,
    ) -> Result<u64, UploadError> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| UploadError::storage(&format!("create {}", path.display()), e))?;

        let mut written: u64 = 0;
        while let Some(chunk) = self.next_chunk(&mut body).await? {
            let chunk = chunk?;
            written += chunk.len() as u64;
            if written > max_bytes {
                return Err(UploadError::TooLarge {
                    limit_bytes: max_bytes,
                });
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| UploadError::storage(&format!("write {}", path.display()), e))?;
        }

        file.flush()
            .await
            .map_err(|e| UploadError::storage(&format!("flush {}", path.display()), e))?;
        file.sync_all()
            .await
            .map_err(|e| UploadError::storage(&format!("sync {}", path.display()), e))?;
        Ok(written)
    }
}

fn hidden_sibling(dir: &Path) -> PathBuf {
    dir.join(format!(
        "{}{}{}",
        PARTIAL_FILE_PREFIX,
        Uuid::new_v4(),
        PARTIAL_FILE_SUFFIX
    ))
}

/// In-flight file, removed unless disarmed after the rename.
///
/// Error paths call `discard`; the `Drop` impl only matters when the request
/// future is dropped mid-upload (client gone).
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn discard(self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed partial upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(
                path = %self.path.display(),
                "Failed to remove partial upload: {}",
                e
            ),
        }
        self.disarm();
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed abandoned upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(
                path = %self.path.display(),
                "Failed to remove abandoned upload: {}",
                e
            ),
        }
    }
}
