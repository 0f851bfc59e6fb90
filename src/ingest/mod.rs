//! Document ingestion: load, split, tag, upsert.

pub mod loader;
pub mod splitter;

use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::vector::{Document, VectorIndex};

pub use splitter::TextSplitter;

/// Tag each chunk with its stable id and source filename, in order.
///
/// `id = "{filename}_{i}"` with `i` the chunk's 0-based position in the
/// file's split output, so re-uploading identical content reproduces the
/// same ids and overwrites in place at the index. Pure and total.
pub fn assign_chunk_ids(filename: &str, chunks: Vec<String>) -> Vec<Document> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| Document {
            id: format!("{}_{}", filename, i),
            text,
            source: filename.to_string(),
        })
        .collect()
}

/// Ingestion entry point: one uploaded file in, one upsert batch out.
pub struct IngestService {
    index: Arc<dyn VectorIndex>,
    splitter: TextSplitter,
}

impl IngestService {
    pub fn new(index: Arc<dyn VectorIndex>, splitter: TextSplitter) -> Self {
        Self { index, splitter }
    }

    /// Load, split, tag and upsert one file. Returns the number of chunks
    /// stored. A file that yields no text or no chunks is a caller-visible
    /// failure, and a failed upsert commits nothing.
    pub async fn ingest_file(&self, filename: &str, bytes: &[u8]) -> Result<usize, ApiError> {
        let text = loader::load_document(filename, bytes)?;
        if text.trim().is_empty() {
            return Err(ApiError::EmptyResult(format!(
                "{} contains no text",
                filename
            )));
        }

        let chunks = self.splitter.split(&text);
        if chunks.is_empty() {
            return Err(ApiError::EmptyResult(format!(
                "no chunks generated from {}",
                filename
            )));
        }

        let documents = assign_chunk_ids(filename, chunks);
        let count = documents.len();
        self.index.add_documents(documents).await?;

        tracing::info!(file = %filename, chunks = count, "file ingested");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::vector::ScoredDocument;

    struct RecordingIndex {
        upserted: Mutex<Vec<Document>>,
    }

    impl RecordingIndex {
        fn new() -> Self {
            Self {
                upserted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        async fn ensure_ready(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn add_documents(&self, documents: Vec<Document>) -> Result<(), ApiError> {
            self.upserted.lock().unwrap().extend(documents);
            Ok(())
        }

        async fn similarity_search(
            &self,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<ScoredDocument>, ApiError> {
            Ok(vec![])
        }
    }

    #[test]
    fn chunk_ids_are_positional_and_source_tagged() {
        let chunks = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let documents = assign_chunk_ids("a.txt", chunks);

        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt_0", "a.txt_1", "a.txt_2"]);
        assert!(documents.iter().all(|d| d.source == "a.txt"));
        assert_eq!(documents[1].text, "two");
    }

    #[test]
    fn chunk_ids_are_stable_across_runs() {
        let chunks = || vec!["alpha".to_string(), "beta".to_string()];
        let first: Vec<String> = assign_chunk_ids("doc.md", chunks())
            .into_iter()
            .map(|d| d.id)
            .collect();
        let second: Vec<String> = assign_chunk_ids("doc.md", chunks())
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ingest_stores_tagged_chunks() {
        let index = Arc::new(RecordingIndex::new());
        let service = IngestService::new(index.clone(), TextSplitter::default());

        let count = service
            .ingest_file("a.txt", b"Some document text worth indexing.")
            .await
            .unwrap();

        assert_eq!(count, 1);
        let upserted = index.upserted.lock().unwrap();
        assert_eq!(upserted[0].id, "a.txt_0");
        assert_eq!(upserted[0].source, "a.txt");
    }

    #[tokio::test]
    async fn empty_file_is_a_visible_failure() {
        let index = Arc::new(RecordingIndex::new());
        let service = IngestService::new(index.clone(), TextSplitter::default());

        let err = service.ingest_file("a.txt", b"   \n ").await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyResult(_)));
        assert!(index.upserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_file_is_rejected_before_upsert() {
        let index = Arc::new(RecordingIndex::new());
        let service = IngestService::new(index.clone(), TextSplitter::default());

        let err = service.ingest_file("a.exe", b"binary").await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedInput(_)));
        assert!(index.upserted.lock().unwrap().is_empty());
    }
}
