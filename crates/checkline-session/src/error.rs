//! Error types for session operations.

use checkline_rules::RulesError;

/// Errors returned to a caller driving the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The move was rejected by the rules engine.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// It is not the local player's turn.
    #[error("not your turn")]
    NotYourTurn,

    /// The engine owns the current turn; wait for its move.
    #[error("engine is thinking")]
    EngineThinking,

    /// Multiplayer mode without a live peer link.
    #[error("no peer connected")]
    NotConnected,

    /// The game has already ended.
    #[error("game is over")]
    GameOver,

    /// The session actor is gone.
    #[error("session has stopped")]
    Stopped,
}
