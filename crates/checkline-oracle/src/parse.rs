//! Extracting a SAN move from a raw service reply.

/// Pulls the candidate move out of a chatty reply.
///
/// The rule: take the trailing whitespace-separated token and strip
/// every character outside `[A-Za-z0-9+#=]` — check, mate, and
/// promotion symbols survive, surrounding punctuation and markdown do
/// not. Returns `None` when nothing move-shaped remains.
pub fn extract_san_token(reply: &str) -> Option<String> {
    let token = reply.split_whitespace().last()?;
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '='))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
