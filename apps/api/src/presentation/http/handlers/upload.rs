use crate::{
    application::upload_file::UploadRequest,
    domain::upload::{StoredFile, UploadCategory, UploadError},
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{HeaderMap, StatusCode, header},
};
use futures_util::{StreamExt, TryStreamExt};
use serde::Serialize;

/// Multipart field that carries the file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub url: String,
}

pub async fn upload_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    upload(state, UploadCategory::Resume, &headers, multipart).await
}

pub async fn upload_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    upload(state, UploadCategory::Profile, &headers, multipart).await
}

fn success_message(category: UploadCategory) -> &'static str {
    match category {
        UploadCategory::Resume => "File uploaded successfully",
        UploadCategory::Profile => "Profile image uploaded successfully",
    }
}

async fn upload(
    state: AppState,
    category: UploadCategory,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        // Claims multipart but cannot be parsed, e.g. no boundary.
        Err(rejection) if declares_multipart(headers) => {
            tracing::warn!("Malformed multipart request: {}", rejection.body_text());
            return Err(UploadError::DecodeFailure(rejection.body_text()).into());
        }
        // Any other body simply carries no file.
        Err(rejection) => {
            tracing::debug!("Not a multipart request: {}", rejection.body_text());
            return Err(AppError::NoFile);
        }
    };

    let limit_bytes = state.uploads.policy().max_bytes;
    let mut stored: Option<StoredFile> = None;

    // The whole body is walked so a second file part fails the request.
    loop {
        let next = multipart
            .next_field()
            .await
            .map_err(|e| classify_multipart_error(e, limit_bytes));
        let field = match next {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(abandon(&state, stored, e).await),
        };

        // Plain form fields are ignored, whatever their name.
        if field.file_name().is_none() {
            continue;
        }
        if stored.is_some() || field.name() != Some(FILE_FIELD) {
            tracing::warn!(field = ?field.name(), "File sent under an unexpected field");
            let err = UploadError::DecodeFailure("Unexpected field".into());
            return Err(abandon(&state, stored, err).await);
        }

        let request = UploadRequest {
            original_name: field.file_name().map(str::to_owned),
            content_type: field.content_type().map(str::to_owned),
            body: field
                .map_err(move |e| classify_multipart_error(e, limit_bytes))
                .boxed(),
        };
        stored = Some(state.uploads.execute(category, Some(request)).await?);
    }

    match stored {
        Some(stored) => Ok(respond(category, stored)),
        None => {
            let stored = state.uploads.execute(category, None).await?;
            Ok(respond(category, stored))
        }
    }
}

/// Drops whatever this request already stored, then hands back `err`.
async fn abandon(state: &AppState, stored: Option<StoredFile>, err: UploadError) -> AppError {
    if let Some(stored) = stored {
        state.uploads.discard(&stored).await;
    }
    err.into()
}

fn declares_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("multipart/form-data"))
}

fn respond(category: UploadCategory, stored: StoredFile) -> Json<UploadResponse> {
    Json(UploadResponse {
        message: success_message(category),
        url: stored.url,
    })
}

/// Body-limit hits become `TooLarge`, everything else the decoder's own message.
fn classify_multipart_error(err: MultipartError, limit_bytes: u64) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { limit_bytes }
    } else {
        UploadError::DecodeFailure(err.body_text())
    }
}
