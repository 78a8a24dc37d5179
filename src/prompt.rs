//! Prompt composition: system prompt, question and retrieved context in one
//! payload string.

use quizbot_search::RetrievalContext;

/// Header introducing the retrieved snippets.
pub const CONTEXT_HEADER: &str = "Additional information:\n";

/// The rendered input for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub payload: String,
}

/// Render `system_prompt`, `query` and every snippet of `context`, in context
/// order, into a [`GenerationRequest`].
///
/// Every snippet contributes a line, sentinels included. No truncation is
/// applied.
pub fn compose(system_prompt: &str, query: &str, context: &RetrievalContext) -> GenerationRequest {
    let context_len: usize = context.snippets().iter().map(|s| s.text.len() + 1).sum();
    let mut payload = String::with_capacity(
        system_prompt.len() + query.len() + CONTEXT_HEADER.len() + context_len + 2,
    );

    payload.push_str(system_prompt);
    payload.push('\n');
    payload.push_str(query);
    payload.push('\n');
    payload.push_str(CONTEXT_HEADER);
    for snippet in context.snippets() {
        payload.push_str(&snippet.text);
        payload.push('\n');
    }

    GenerationRequest { payload }
}
