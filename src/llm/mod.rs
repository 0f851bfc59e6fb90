//! Language-model providers.

pub mod groq;
pub mod ollama;
pub mod provider;

use std::sync::Arc;

use crate::config::{AppConfig, LlmProviderKind};
use crate::core::errors::ApiError;

pub use groq::GroqProvider;
pub use ollama::OllamaProvider;
pub use provider::LlmProvider;

/// Build the chat provider named by the configuration.
pub fn provider_from_config(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, ApiError> {
    match config.provider {
        LlmProviderKind::Ollama => Ok(Arc::new(OllamaProvider::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            config.embed_model.clone(),
        ))),
        LlmProviderKind::Groq => {
            let api_key = config
                .groq_api_key
                .clone()
                .ok_or_else(|| ApiError::Config("GROQ_API_KEY not set".to_string()))?;
            Ok(Arc::new(GroqProvider::new(api_key, config.groq_model.clone())))
        }
    }
}

/// Build the embedding provider. Always Ollama: embeddings are computed
/// locally even when chat generation is hosted.
pub fn embedder_from_config(config: &AppConfig) -> Arc<dyn LlmProvider> {
    Arc::new(OllamaProvider::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.embed_model.clone(),
    ))
}
