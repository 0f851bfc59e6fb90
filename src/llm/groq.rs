use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::provider::LlmProvider;
use crate::core::errors::ApiError;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Hosted Groq backend, spoken to over the OpenAI-compatible
/// chat-completions API (SSE for streaming).
#[derive(Clone)]
pub struct GroqProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: Client::new(),
        }
    }

    fn request_body(&self, prompt: &str, stream: bool) -> Value {
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": stream,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/chat/completions", GROQ_BASE_URL);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, false))
            .send()
            .await
            .map_err(ApiError::generation)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Generation(format!("groq chat error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::generation)?;
        Ok(payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    async fn stream(
        &self,
        prompt: &str,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let url = format!("{}/chat/completions", GROQ_BASE_URL);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, true))
            .send()
            .await
            .map_err(ApiError::generation)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Generation(format!("groq stream error: {}", text)));
        }

        let (tx, rx) = mpsc::channel(32);
        let mut stream = res.bytes_stream();

        tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(bytes) => {
                        let chunk_str = String::from_utf8_lossy(&bytes);
                        for line in chunk_str.lines() {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            if line == "data: [DONE]" {
                                return;
                            }
                            if let Some(data) = line.strip_prefix("data: ") {
                                if let Ok(json) = serde_json::from_str::<Value>(data) {
                                    if let Some(content) =
                                        json["choices"][0]["delta"]["content"].as_str()
                                    {
                                        if !content.is_empty()
                                            && tx.send(Ok(content.to_string())).await.is_err()
                                        {
                                            return;
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ApiError::generation(e))).await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        Err(ApiError::Config(
            "groq provider does not expose an embedding API".to_string(),
        ))
    }
}
