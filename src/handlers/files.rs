use crate::AppState;
use crate::error::AppError;
use crate::utils::validation::{sanitize_filename, validate_file_size};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum::extract::multipart::MultipartError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    /// Name the file was stored under; may differ from the client's name
    pub filename: String,
}

#[derive(Serialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

// A body that blows through the outer DefaultBodyLimit surfaces here as a
// multipart read failure; preserve the 413 instead of collapsing it to 400.
fn map_multipart_err(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("invalid multipart request: {e}"))
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part or empty filename"),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid token"),
        (status = 413, description = "Payload too large")
    ),
    security(
        ("bearer" = [])
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_err)? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let filename = sanitize_filename(&original)?;

        let data = field.bytes().await.map_err(map_multipart_err)?;
        validate_file_size(data.len(), state.config.max_upload_bytes)?;

        state.storage.save(&filename, &data).await?;
        tracing::info!(filename = %filename, size = data.len(), "stored upload");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                status: "ok".to_string(),
                filename,
            }),
        ));
    }

    Err(AppError::BadRequest(
        "no file part named 'file'".to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "Sorted list of stored filenames", body = FileListResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid token")
    ),
    security(
        ("bearer" = [])
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, AppError> {
    let files = state.storage.list().await?;
    Ok(Json(FileListResponse { files }))
}

#[utoipa::path(
    get,
    path = "/files/{filename}",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "Raw file content, served inline"),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer" = [])
    ),
    tag = "files"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    // Same sanitization as upload, so traversal sequences in the path
    // segment can only resolve to names inside the storage root
    let filename = sanitize_filename(&filename)?;
    let content = state.storage.read(&filename).await?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    let headers = [
        (header::CONTENT_TYPE, mime.essence_str().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, content).into_response())
}
