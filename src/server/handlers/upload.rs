use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

/// `POST /upload` — accept one or more files as multipart form data and
/// ingest each into the vector index. Fails on the first bad file; files
/// already ingested stay ingested (their ids make re-upload idempotent).
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut uploaded_files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown_file".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read {}: {}", filename, e)))?;

        let chunks = state.ingest.ingest_file(&filename, &bytes).await?;
        tracing::info!(file = %filename, chunks, "upload processed");
        uploaded_files.push(filename);
    }

    if uploaded_files.is_empty() {
        return Err(ApiError::BadRequest("no files in upload".to_string()));
    }

    Ok(Json(json!({
        "message": "Files uploaded and processed",
        "files": uploaded_files,
    })))
}
