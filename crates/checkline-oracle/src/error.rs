//! Error types for the suggestion client.

/// Errors that can occur while obtaining a move suggestion.
///
/// None of these reach the user: every variant funnels into the
/// session layer's random-move fallback.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The HTTP request failed (network, timeout, or non-success status).
    #[error("suggestion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered but the reply carried no usable text.
    #[error("empty suggestion reply")]
    EmptyReply,
}
