use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, Sse};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::wrappers::ReceiverStream;

use crate::core::errors::ApiError;
use crate::language::detect_language;
use crate::rag::StreamEvent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub session_id: String,
}

/// `POST /chat` — answer a question in one response.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    let language = detect_language(&request.query);

    let result = state
        .pipeline
        .answer(&request.session_id, &request.query)
        .await?;

    Ok(Json(json!({
        "answer": result.answer,
        "metadata": {
            "language": language,
            "retrieved_chunks": result.retrieved_chunks,
        }
    })))
}

/// `POST /chat/stream` — answer a question as an SSE stream: `answer`
/// events carrying text fragments, one final `done` event carrying the
/// retrieval metadata, or an `error` event if generation fails mid-stream.
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    let language = detect_language(&request.query);

    let rx = state
        .pipeline
        .answer_stream(&request.session_id, &request.query)
        .await?;

    let stream = ReceiverStream::new(rx).map(move |event| {
        let sse = match event {
            Ok(StreamEvent::Fragment { text }) => SseEvent::default().event("answer").data(text),
            Ok(StreamEvent::Done { retrieved_chunks }) => {
                let metadata = json!({
                    "language": language,
                    "retrieved_chunks": retrieved_chunks,
                });
                SseEvent::default()
                    .event("done")
                    .data(metadata.to_string())
            }
            Err(err) => SseEvent::default().event("error").data(err.to_string()),
        };
        Ok(sse)
    });

    Ok(Sse::new(stream))
}
