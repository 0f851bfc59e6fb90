//! Context assembly from retrieved chunks.

use serde::{Deserialize, Serialize};

use crate::vector::ScoredDocument;

/// Provenance descriptor for one retrieved chunk, returned alongside the
/// answer for citation display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: String,
    pub chunk_id: String,
    pub similarity_score: f32,
}

/// Join chunk texts into the grounding context and keep a parallel
/// descriptor list, both in the order the index returned them.
///
/// No deduplication and no length cap; an oversized context is surfaced by
/// the model call, not here.
pub fn assemble_context(documents: &[ScoredDocument]) -> (String, Vec<RetrievedChunk>) {
    let context = documents
        .iter()
        .map(|doc| doc.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let chunks = documents
        .iter()
        .map(|doc| RetrievedChunk {
            text: doc.text.clone(),
            source: doc.source.clone(),
            chunk_id: doc.id.clone(),
            similarity_score: doc.score,
        })
        .collect();

    (context, chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            id: id.to_string(),
            text: text.to_string(),
            source: "a.txt".to_string(),
            score,
        }
    }

    #[test]
    fn joins_texts_with_blank_line_in_order() {
        let docs = vec![doc("a.txt_0", "first", 0.9), doc("a.txt_1", "second", 0.7)];
        let (context, chunks) = assemble_context(&docs);
        assert_eq!(context, "first\n\nsecond");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "a.txt_0");
        assert_eq!(chunks[1].chunk_id, "a.txt_1");
        assert_eq!(chunks[0].similarity_score, 0.9);
    }

    #[test]
    fn empty_retrieval_yields_empty_context() {
        let (context, chunks) = assemble_context(&[]);
        assert_eq!(context, "");
        assert!(chunks.is_empty());
    }
}
