use crate::{
    application::upload_file::dto::UploadRequest,
    domain::upload::{
        StoredFile, StoredFileName, UploadCategory, UploadError, UploadPolicy,
        entity::public_url,
    },
    infrastructure::storage::FileStorage,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Validates a single uploaded file and writes it to its category's directory.
///
/// Checks run in order and stop at the first failure:
/// 1. a file part is present
/// 2. its declared MIME type is on the category's allow-list
/// 3. its body fits under the size ceiling (enforced while streaming)
///
/// The MIME check runs before any byte is written. The size check aborts the
/// write as soon as the ceiling is crossed and the storage removes the
/// partial file.
pub struct UploadFileUseCase {
    policy: Arc<UploadPolicy>,
    storage: Arc<dyn FileStorage>,
}

impl UploadFileUseCase {
    pub fn new(policy: Arc<UploadPolicy>, storage: Arc<dyn FileStorage>) -> Self {
        info!(
            max_bytes = policy.max_bytes,
            resume_dir = %policy.resume.destination.display(),
            profile_dir = %policy.profile.destination.display(),
            "Initializing UploadFileUseCase"
        );
        Self { policy, storage }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    #[instrument(skip(self, request), fields(
        category = %category,
        content_type = request.as_ref().and_then(|r| r.content_type.as_deref()).unwrap_or(""),
    ))]
    pub async fn execute(
        &self,
        category: UploadCategory,
        request: Option<UploadRequest<'_>>,
    ) -> Result<StoredFile, UploadError> {
        let Some(request) = request else {
            debug!("Request carried no file part");
            return Err(UploadError::NoFile);
        };

        let content_type = match request.content_type {
            Some(ct) if self.policy.accepts(category, &ct) => ct,
            other => {
                warn!(declared = ?other, "Rejected upload with disallowed content type");
                return Err(UploadError::InvalidType {
                    category,
                    content_type: other,
                });
            }
        };

        let file_name = StoredFileName::generate(request.original_name.as_deref());
        let dir = self.policy.destination(category);

        let size_bytes = self
            .storage
            .persist(dir, file_name.as_str(), request.body, self.policy.max_bytes)
            .await
            .inspect_err(|e| match e {
                UploadError::StorageFailure(detail) => {
                    error!(file_name = %file_name, "Storing upload failed: {}", detail)
                }
                other => warn!(file_name = %file_name, "Upload aborted: {}", other),
            })?;

        let stored = StoredFile {
            category,
            url: public_url(&self.policy.public_prefix, category, &file_name),
            path: dir.join(file_name.as_str()),
            file_name,
            content_type,
            size_bytes,
            stored_at: chrono::Utc::now(),
        };

        info!(
            url = %stored.url,
            size_bytes = stored.size_bytes,
            "Upload stored"
        );
        Ok(stored)
    }

    /// Removes a file stored earlier in a request that went on to fail.
    pub async fn discard(&self, stored: &StoredFile) {
        match self.storage.remove(&stored.path).await {
            Ok(()) => debug!(path = %stored.path.display(), "Discarded stored upload"),
            Err(e) => error!(path = %stored.path.display(), "Failed to discard upload: {}", e),
        }
    }
}
