use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::path::Path;

use crate::domain::upload::UploadError;

/// Body of an upload, as decoded chunks.
pub type ByteStream<'a> = BoxStream<'a, Result<Bytes, UploadError>>;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Streams `body` into `dir/file_name`, failing with `TooLarge` once more
    /// than `max_bytes` have been read. Returns the number of bytes written.
    ///
    /// Nothing is left under `file_name` when this returns an error.
    async fn persist(
        &self,
        dir: &Path,
        file_name: &str,
        body: ByteStream<'_>,
        max_bytes: u64,
    ) -> Result<u64, UploadError>;

    /// Deletes a file written by `persist`. A file that is already gone is not an error.
    async fn remove(&self, path: &Path) -> anyhow::Result<()>;

    /// Whether a file can be created in `dir` right now.
    async fn is_writable(&self, dir: &Path) -> bool;
}
