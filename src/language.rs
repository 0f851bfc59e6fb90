/// Detect the language of a query, returned as an ISO 639-3 code
/// ("eng", "jpn", ...) or "unknown" when detection fails.
pub fn detect_language(text: &str) -> String {
    whatlang::detect(text)
        .map(|info| info.lang().code().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
