use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::provider::LlmProvider;
use crate::core::errors::ApiError;

/// Local Ollama backend. Also serves the embedding endpoint regardless of
/// which provider handles chat, since the hosted provider has no embedding
/// API.
#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    model: String,
    embed_model: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String, embed_model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            embed_model,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::generation)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Generation(format!("ollama generate error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::generation)?;
        Ok(payload["response"].as_str().unwrap_or_default().to_string())
    }

    async fn stream(
        &self,
        prompt: &str,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": true,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::generation)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Generation(format!("ollama stream error: {}", text)));
        }

        let (tx, rx) = mpsc::channel(32);
        let mut stream = res.bytes_stream();

        // Ollama streams newline-delimited JSON objects, one per fragment,
        // with "done": true on the final object.
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
                            if let Ok(json) = serde_json::from_str::<Value>(line) {
                                if let Some(fragment) = json["response"].as_str() {
                                    if !fragment.is_empty()
                                        && tx.send(Ok(fragment.to_string())).await.is_err()
                                    {
                                        return;
                                    }
                                }
                                if json["done"].as_bool() == Some(true) {
                                    return;
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

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        let url = format!("{}/api/embeddings", self.base_url);

        let mut embeddings = Vec::with_capacity(inputs.len());
        for input in inputs {
            let body = json!({
                "model": self.embed_model,
                "prompt": input,
            });

            let res = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(ApiError::retrieval)?;

            if !res.status().is_success() {
                let text = res.text().await.unwrap_or_default();
                return Err(ApiError::Retrieval(format!("ollama embed error: {}", text)));
            }

            let payload: Value = res.json().await.map_err(ApiError::retrieval)?;
            let vec: Vec<f32> = payload["embedding"]
                .as_array()
                .map(|vals| {
                    vals.iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect()
                })
                .unwrap_or_default();

            if vec.is_empty() {
                return Err(ApiError::Retrieval(
                    "ollama embed returned no vector".to_string(),
                ));
            }
            embeddings.push(vec);
        }

        Ok(embeddings)
    }
}
