use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::analysis::{analyze_file, ClipResult};
use crate::response::AppError;
use crate::state::AppState;
use crate::upload::TempUpload;

const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-video/", post(upload_video))
        .route("/upload-video", post(upload_video))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    frame_results: ClipResult,
}

async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = receive_file(&state, &mut multipart).await?;

    let backend = state.backend();
    let config = state.config().analysis;
    let span = tracing::Span::current();

    // The guard moves into the blocking task so the file outlives the
    // analysis even if the client goes away first.
    let clip = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let result = analyze_file(backend.as_ref(), upload.path(), None, &config);
        drop(upload);
        result
    })
    .await
    .map_err(|e| AppError::internal(&format!("analysis task failed: {e}")))??;

    Ok(Json(UploadResponse {
        frame_results: clip,
    }))
}

async fn receive_file(state: &AppState, multipart: &mut Multipart) -> Result<TempUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let upload = TempUpload::reserve(&state.config().upload.dir, &original_name)
            .map_err(|e| AppError::internal(&format!("cannot reserve upload path: {e}")))?;

        let size = save_field(field, &upload).await?;
        tracing::info!(
            file = %original_name,
            bytes = size,
            path = %upload.path().display(),
            "Upload stored"
        );
        return Ok(upload);
    }

    Err(AppError::bad_request(
        "MISSING_FILE",
        "multipart field 'file' is required",
    ))
}

async fn save_field(mut field: Field<'_>, upload: &TempUpload) -> Result<u64, AppError> {
    let mut file = tokio::fs::File::create(upload.path())
        .await
        .map_err(|e| AppError::internal(&format!("cannot create upload file: {e}")))?;

    let mut size = 0_u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::internal(&format!("cannot write upload file: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::internal(&format!("cannot flush upload file: {e}")))?;

    Ok(size)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("uploaded file exceeds the size limit")
    } else {
        tracing::warn!(error = %err, "Malformed multipart body");
        AppError::bad_request("INVALID_MULTIPART", &err.body_text())
    }
}
