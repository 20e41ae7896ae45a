//! Prompt construction for the three digest stages.
//!
//! Every stage sends exactly one of these prompts; the embedded fields are
//! the stage's data contract, so tests assert on them.

/// Closed category set offered to the tagging prompt.
pub(crate) const CATEGORIES: [&str; 5] = [
    "Technology",
    "Politics",
    "Science",
    "Business",
    "Entertainment",
];

/// Instruction asking for a 2-3 sentence news summary of the topic.
pub(crate) fn summary_prompt(topic: &str) -> String {
    format!("Write a 2-3 sentence news summary about: {topic}")
}

/// Instruction asking for 3 keywords and one category, derived from the
/// summary text (never the raw topic).
pub(crate) fn tags_prompt(summary: &str) -> String {
    format!(
        "From this text, extract 3 keywords and assign one category ({}). Text: {summary}",
        CATEGORIES.join("/")
    )
}

/// Instruction asking for one headline of at most 12 words. Both the summary
/// and the tags are embedded; a headline derived from either one alone is
/// less specific.
pub(crate) fn headline_prompt(summary: &str, tags: &str) -> String {
    format!(
        "Write ONE punchy headline (max 12 words). Use this summary: {summary} and these tags: {tags}"
    )
}
