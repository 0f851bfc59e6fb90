//! Environment-driven configuration.
//!
//! Everything is read once at startup; missing required values abort before
//! the listener is bound. A `.env` file next to the working directory is
//! loaded first so local runs do not need exported variables.

use std::env;

use crate::core::errors::ApiError;

/// Which language-model backend serves generation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProviderKind {
    Ollama,
    Groq,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub provider: LlmProviderKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub embed_model: String,
    pub embed_dim: usize,
    pub pinecone_api_key: String,
    pub pinecone_index: String,
    pub max_turns: usize,
    pub retrieval_k: usize,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Fails with `ApiError::Config` when a required value is missing or
    /// unparsable, so startup stops before any request is served.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenv::dotenv().ok();

        let provider = match env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "ollama".to_string())
            .to_lowercase()
            .as_str()
        {
            "groq" => LlmProviderKind::Groq,
            "ollama" => LlmProviderKind::Ollama,
            other => {
                return Err(ApiError::Config(format!(
                    "unknown LLM_PROVIDER '{}' (expected 'ollama' or 'groq')",
                    other
                )))
            }
        };

        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|v| !v.is_empty());
        if provider == LlmProviderKind::Groq && groq_api_key.is_none() {
            return Err(ApiError::Config(
                "GROQ_API_KEY not set but LLM_PROVIDER=groq".to_string(),
            ));
        }

        let pinecone_api_key = env::var("PINECONE_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Config("PINECONE_API_KEY not set in environment".to_string()))?;

        Ok(Self {
            port: parse_env("PORT", 8000)?,
            provider,
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama2".to_string()),
            groq_api_key,
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            embed_model: env::var("EMBED_MODEL").unwrap_or_else(|_| "all-minilm".to_string()),
            embed_dim: parse_env("EMBED_DIM", 384)?,
            pinecone_api_key,
            pinecone_index: env::var("PINECONE_INDEX")
                .unwrap_or_else(|_| "rag-chatbot-hf".to_string()),
            max_turns: parse_env("MAX_TURNS", 5)?,
            retrieval_k: parse_env("RETRIEVAL_K", 4)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ApiError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ApiError::Config(format!("invalid value for {}: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
