use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{Document, ScoredDocument, VectorIndex};
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// Pinecone serverless index, spoken to over its REST API.
///
/// Embeddings are computed through the configured embedding provider before
/// upsert and query; chunk text and provenance ride along as vector
/// metadata.
pub struct PineconeIndex {
    api_key: String,
    index_name: String,
    dimension: usize,
    embedder: Arc<dyn LlmProvider>,
    client: Client,
    host: OnceLock<String>,
}

impl PineconeIndex {
    pub fn new(
        api_key: String,
        index_name: String,
        dimension: usize,
        embedder: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            api_key,
            index_name,
            dimension,
            embedder,
            client: Client::new(),
            host: OnceLock::new(),
        }
    }

    async fn data_plane_url(&self) -> Result<String, ApiError> {
        if let Some(host) = self.host.get() {
            return Ok(format!("https://{}", host));
        }

        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, self.index_name);
        let res = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(ApiError::retrieval)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!(
                "failed to describe index '{}': {}",
                self.index_name, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::retrieval)?;
        let host = payload["host"]
            .as_str()
            .ok_or_else(|| ApiError::Retrieval("index description carries no host".to_string()))?
            .to_string();

        let _ = self.host.set(host.clone());
        Ok(format!("https://{}", host))
    }

    async fn index_exists(&self) -> Result<bool, ApiError> {
        let url = format!("{}/indexes", CONTROL_PLANE_URL);
        let res = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(ApiError::retrieval)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!("failed to list indexes: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::retrieval)?;
        let exists = payload["indexes"]
            .as_array()
            .map(|indexes| {
                indexes
                    .iter()
                    .any(|idx| idx["name"].as_str() == Some(self.index_name.as_str()))
            })
            .unwrap_or(false);

        Ok(exists)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_ready(&self) -> Result<(), ApiError> {
        if self.index_exists().await? {
            tracing::info!(index = %self.index_name, "pinecone index present");
            return Ok(());
        }

        tracing::info!(index = %self.index_name, dimension = self.dimension, "creating pinecone index");

        let url = format!("{}/indexes", CONTROL_PLANE_URL);
        let body = json!({
            "name": self.index_name,
            "dimension": self.dimension,
            "metric": "cosine",
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}},
        });

        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::retrieval)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!(
                "failed to create index '{}': {}",
                self.index_name, text
            )));
        }

        Ok(())
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<(), ApiError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;

        let vectors: Vec<Value> = documents
            .iter()
            .zip(embeddings.iter())
            .map(|(doc, embedding)| {
                json!({
                    "id": doc.id,
                    "values": embedding,
                    "metadata": {
                        "text": doc.text,
                        "source": doc.source,
                        "chunk_id": doc.id,
                    },
                })
            })
            .collect();

        let url = format!("{}/vectors/upsert", self.data_plane_url().await?);
        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&json!({"vectors": vectors}))
            .send()
            .await
            .map_err(ApiError::retrieval)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!("upsert failed: {}", text)));
        }

        tracing::debug!(count = documents.len(), "upserted documents");
        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>, ApiError> {
        let embeddings = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Retrieval("embedder returned no query vector".to_string()))?;

        let url = format!("{}/query", self.data_plane_url().await?);
        let body = json!({
            "vector": query_vector,
            "topK": k,
            "includeMetadata": true,
        });

        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::retrieval)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!("query failed: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::retrieval)?;
        let matches = payload["matches"].as_array().cloned().unwrap_or_default();

        let documents = matches
            .iter()
            .map(|m| ScoredDocument {
                id: m["id"].as_str().unwrap_or_default().to_string(),
                text: m["metadata"]["text"].as_str().unwrap_or_default().to_string(),
                source: m["metadata"]["source"].as_str().unwrap_or_default().to_string(),
                score: m["score"].as_f64().unwrap_or(0.0) as f32,
            })
            .collect();

        Ok(documents)
    }
}
