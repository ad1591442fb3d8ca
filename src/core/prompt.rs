//! Default prompt templates and prompt composition.

/// Prompts offered when neither the config nor the command line supplies any.
pub const DEFAULT_PROMPTS: [&str; 3] = [
    "Summarize the key points of this text.",
    "Identify the main themes and give a short explanation of each theme.",
    "Ask three critical questions about the content of this text.",
];

pub fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
}

/// Joins a template and the source text with a blank line, template first.
pub fn compose(template: &str, text: &str) -> String {
    format!("{template}\n\n{text}")
}
