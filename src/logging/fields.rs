//! Field helpers for structured logging

const PREVIEW_CHARS: usize = 100;

/// Truncate a question for a log preview (privacy-safe)
///
/// Returns `None` when content logging is disabled or the question is
/// blank. Otherwise returns at most the first 100 characters, with `...`
/// appended when something was cut.
///
/// # Examples
///
/// ```
/// use oracle::logging::truncate_question;
///
/// assert_eq!(truncate_question("Import permits?", false), None);
/// assert_eq!(
///     truncate_question("Import permits?", true).as_deref(),
///     Some("Import permits?")
/// );
/// ```
pub fn truncate_question(question: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging {
        return None;
    }

    let question = question.trim();
    if question.is_empty() {
        return None;
    }

    Some(truncate_chars(question, PREVIEW_CHARS))
}

// Counts chars, not bytes, so multi-byte text never splits mid-character.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
