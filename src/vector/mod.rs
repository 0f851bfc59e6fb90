//! Vector index abstraction.
//!
//! The pipeline retrieves by text query and upserts plain documents; how
//! the backing index embeds, stores and searches them is the provider's
//! concern. The production implementation is `PineconeIndex`.

pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

pub use pinecone::PineconeIndex;

/// A unit of text handed to the index for storage.
///
/// `id` doubles as the upsert key, so re-ingesting a file with identical
/// content overwrites its previous chunks in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub source: String,
}

/// One similarity-search match, highest score first in the result order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: String,
    pub text: String,
    pub source: String,
    pub score: f32,
}

/// Abstract interface over the external similarity index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the backing index if it does not exist yet. Called once at
    /// process start, before any request is served.
    async fn ensure_ready(&self) -> Result<(), ApiError>;

    /// Bulk-upsert documents. All-or-nothing per call.
    async fn add_documents(&self, documents: Vec<Document>) -> Result<(), ApiError>;

    /// Top-`k` most similar documents, ordered by descending relevance.
    /// An index with no matching content returns an empty list, not an
    /// error; transport failures surface as `ApiError::Retrieval`.
    async fn similarity_search(&self, query: &str, k: usize)
        -> Result<Vec<ScoredDocument>, ApiError>;
}
