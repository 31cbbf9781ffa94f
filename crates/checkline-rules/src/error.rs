//! Error types for the rules layer.

/// Errors that can occur when querying or mutating a position.
///
/// The session layer treats most of these as "silently reject" — a
/// user click against a stale legal-move list or a malformed AI reply
/// must never fault the session. The variants exist so callers can
/// log precisely what was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The move text could not be parsed as standard algebraic notation.
    #[error("invalid SAN: {0}")]
    InvalidSan(String),

    /// The FEN text did not describe a playable position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The move parsed but is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The game is already over; no further moves can be applied.
    #[error("game is over")]
    GameOver,
}
