//! Generation orchestrator.
//!
//! Composes session memory, query enhancement, retrieval, context assembly
//! and prompt construction, then drives the language model in buffered or
//! streaming form. The session turn is committed only after the full answer
//! is known; a failed or cancelled generation leaves the session untouched.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use super::context::{assemble_context, RetrievedChunk};
use super::prompt::build_prompt;
use super::query::enhance_query;
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;
use crate::memory::SessionStore;
use crate::vector::VectorIndex;

/// Buffered-mode result.
#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub retrieved_chunks: Vec<RetrievedChunk>,
}

/// Streaming-mode events, in order: zero or more fragments, then exactly
/// one `Done` once the turn has been committed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Fragment { text: String },
    Done { retrieved_chunks: Vec<RetrievedChunk> },
}

pub struct RagPipeline {
    sessions: Arc<SessionStore>,
    index: Arc<dyn VectorIndex>,
    provider: Arc<dyn LlmProvider>,
    retrieval_k: usize,
}

impl RagPipeline {
    pub fn new(
        sessions: Arc<SessionStore>,
        index: Arc<dyn VectorIndex>,
        provider: Arc<dyn LlmProvider>,
        retrieval_k: usize,
    ) -> Self {
        Self {
            sessions,
            index,
            provider,
            retrieval_k,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Shared front half of both modes: history → enhanced query →
    /// retrieval → context/prompt.
    async fn prepare(
        &self,
        session_id: &str,
        question: &str,
    ) -> Result<(String, Vec<RetrievedChunk>), ApiError> {
        let memory = self.sessions.session(session_id);
        let history = memory.lock().expect("session memory poisoned").formatted_history();

        let enhanced = enhance_query(&history, question);
        let documents = self.index.similarity_search(&enhanced, self.retrieval_k).await?;
        tracing::debug!(
            session = %session_id,
            retrieved = documents.len(),
            "retrieval complete"
        );

        let (context, chunks) = assemble_context(&documents);
        let prompt = build_prompt(&context, question);
        Ok((prompt, chunks))
    }

    /// Buffered mode: generate the complete answer, then record the turn.
    pub async fn answer(&self, session_id: &str, question: &str) -> Result<ChatAnswer, ApiError> {
        let (prompt, chunks) = self.prepare(session_id, question).await?;

        let answer = self.provider.generate(&prompt).await?;

        let memory = self.sessions.session(session_id);
        memory
            .lock()
            .expect("session memory poisoned")
            .add_turn(question, answer.as_str(), None);

        tracing::info!(session = %session_id, answer_len = answer.len(), "answer generated");

        Ok(ChatAnswer {
            answer,
            retrieved_chunks: chunks,
        })
    }

    /// Streaming mode: forward each model fragment as it arrives while
    /// accumulating the full answer. The turn is committed only after the
    /// provider stream ends normally; an upstream error or a consumer
    /// disconnect discards the accumulation and commits nothing.
    pub async fn answer_stream(
        &self,
        session_id: &str,
        question: &str,
    ) -> Result<mpsc::Receiver<Result<StreamEvent, ApiError>>, ApiError> {
        let (prompt, chunks) = self.prepare(session_id, question).await?;

        let mut upstream = self.provider.stream(&prompt).await?;

        // Capacity 1: the forward task cannot run ahead of the consumer,
        // so fragments are handed off one at a time, in order.
        let (tx, rx) = mpsc::channel(1);

        let memory = self.sessions.session(session_id);
        let session_id = session_id.to_string();
        let question = question.to_string();

        tokio::spawn(async move {
            let mut full_answer = String::new();

            while let Some(item) = upstream.recv().await {
                match item {
                    Ok(fragment) => {
                        full_answer.push_str(&fragment);
                        if tx
                            .send(Ok(StreamEvent::Fragment { text: fragment }))
                            .await
                            .is_err()
                        {
                            tracing::warn!(session = %session_id, "stream consumer gone, turn discarded");
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(session = %session_id, error = %err, "stream failed, turn discarded");
                        let _ = tx.send(Err(err)).await;
                        return;
                    }
                }
            }

            memory
                .lock()
                .expect("session memory poisoned")
                .add_turn(question.as_str(), full_answer.as_str(), None);
            tracing::info!(session = %session_id, answer_len = full_answer.len(), "stream complete");

            let _ = tx
                .send(Ok(StreamEvent::Done {
                    retrieved_chunks: chunks,
                }))
                .await;
        });

        Ok(rx)
    }
}
