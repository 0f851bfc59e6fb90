use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::errors::ApiError;

/// Pluggable language-model backend.
///
/// Selected once at startup from configuration; the pipeline only sees this
/// trait. The stream receiver yields text fragments in order and is finite;
/// it cannot be restarted once consumed.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "ollama", "groq").
    fn name(&self) -> &str;

    /// Complete the prompt and return the full answer text.
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;

    /// Complete the prompt as a stream of incremental text fragments.
    async fn stream(&self, prompt: &str)
        -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError>;

    /// Embed each input text into a vector.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}
