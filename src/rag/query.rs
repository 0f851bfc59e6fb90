//! Retrieval-query enhancement.

/// Fold the session history into the retrieval query so follow-up questions
/// ("what about its cost?") retrieve chunks for the antecedent topic rather
/// than the literal pronoun.
///
/// Deterministic and side-effect free; an empty history still produces the
/// (empty) history section. The result is used only for retrieval, never as
/// the generation prompt.
pub fn enhance_query(formatted_history: &str, question: &str) -> String {
    format!(
        "Conversation so far:\n{}\n\nUser question:\n{}",
        formatted_history, question
    )
}
