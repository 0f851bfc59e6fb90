use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::errors::ApiError;
use crate::ingest::{IngestService, TextSplitter};
use crate::llm;
use crate::memory::{SessionStore, DEFAULT_MAX_SESSIONS};
use crate::rag::RagPipeline;
use crate::vector::{PineconeIndex, VectorIndex};

pub struct AppState {
    pub config: AppConfig,
    pub index: Arc<dyn VectorIndex>,
    pub pipeline: RagPipeline,
    pub ingest: IngestService,
}

impl AppState {
    pub fn initialize(config: AppConfig) -> Result<Arc<Self>, ApiError> {
        let provider = llm::provider_from_config(&config)?;
        let embedder = llm::embedder_from_config(&config);
        tracing::info!(provider = provider.name(), "language model provider selected");

        let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::new(
            config.pinecone_api_key.clone(),
            config.pinecone_index.clone(),
            config.embed_dim,
            embedder,
        ));

        let sessions = Arc::new(SessionStore::new(config.max_turns, DEFAULT_MAX_SESSIONS));
        let pipeline = RagPipeline::new(
            sessions,
            index.clone(),
            provider,
            config.retrieval_k,
        );
        let ingest = IngestService::new(index.clone(), TextSplitter::default());

        Ok(Arc::new(AppState {
            config,
            index,
            pipeline,
            ingest,
        }))
    }
}
