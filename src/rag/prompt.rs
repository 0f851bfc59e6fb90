//! Generation prompt construction.

/// Static instruction prepended to every generation prompt. Not templated
/// with request data.
pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant that answers questions based solely on the provided context. Do not use any outside knowledge or information not present in the context. If the answer to the question is not found in the context, respond with: \"I don’t have enough information to answer that.\" Provide concise, clear, and structured answers. If the context is long, summarize it appropriately.";

/// Render the final prompt: the fixed instruction followed by the
/// context/question template.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContext: {}\nQuestion: {}",
        SYSTEM_INSTRUCTION, context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_instruction_context_and_question() {
        let prompt = build_prompt("some context", "some question");
        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        assert!(prompt.contains("Context: some context"));
        assert!(prompt.ends_with("Question: some question"));
    }

    #[test]
    fn instruction_names_the_fallback_phrase() {
        assert!(SYSTEM_INSTRUCTION.contains("I don’t have enough information to answer that."));
    }
}
