//! Turns a batch of results into titled Markdown blocks, one per prompt.

use std::fmt::Write;

use crate::inference::CompletionResult;

/// Renders `results` as `## Result for Prompt i` sections, numbered from 1.
///
/// With `qualify_errors`, failure markers name the model that failed.
pub fn render_results(results: &[CompletionResult], qualify_errors: bool) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        let body = if qualify_errors {
            result.qualified()
        } else {
            result.to_string()
        };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "## Result for Prompt {}\n\n{}\n", i + 1, body.trim_end());
    }
    out
}
