use crate::infrastructure::storage::ByteStream;

/// One file part of an incoming multipart body.
pub struct UploadRequest<'a> {
    /// Name the client gave the file. Only its extension is ever used.
    pub original_name: Option<String>,
    /// MIME type declared in the part headers.
    pub content_type: Option<String>,
    pub body: ByteStream<'a>,
}

impl std::fmt::Debug for UploadRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
