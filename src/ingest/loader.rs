//! Uploaded-document loading.

use std::path::Path;

use crate::core::errors::ApiError;

/// Extract the text of an uploaded file based on its extension.
///
/// Plain-text formats are accepted; anything else is rejected as
/// unsupported input (reported to the caller, not retried).
pub fn load_document(filename: &str, bytes: &[u8]) -> Result<String, ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" => String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::BadRequest(format!("{} is not valid UTF-8", filename))),
        other => Err(ApiError::UnsupportedInput(format!(
            "unsupported file type: .{}",
            other
        ))),
    }
}
