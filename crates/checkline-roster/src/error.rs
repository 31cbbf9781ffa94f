//! Error types for roster operations.

/// Errors surfaced by [`Roster`](crate::Roster) operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Registration with a name that already has a record.
    #[error("player name already taken: {0}")]
    NameTaken(String),

    /// Login with a name that has no record.
    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    /// Login with the wrong credential for an existing record.
    #[error("wrong credential for player: {0}")]
    WrongCredential(String),

    /// Registration or login with an empty name or credential.
    #[error("name and credential must be non-empty")]
    MissingField,

    /// The backing store could not be read or parsed.
    #[error("roster store error: {0}")]
    Store(#[from] std::io::Error),

    /// The backing store held malformed JSON.
    #[error("roster store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
