//! Unified error type for the Checkline client.

use checkline_peer::PeerError;
use checkline_protocol::ProtocolError;
use checkline_roster::RosterError;
use checkline_session::SessionError;

/// Everything a [`Client`](crate::Client) call can fail with.
///
/// Each layer of the stack keeps its own error enum; this one exists so
/// embedders match on a single type at the API boundary. Variants are
/// transparent wrappers, so the message and source chain of the
/// underlying error come through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ChecklineError {
    /// A session-level error (turn order, game over, stopped actor).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A peer-link error (listen, connect, send, receive).
    #[error(transparent)]
    Peer(#[from] PeerError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A roster-level error (credentials, store).
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The client has no active hosted room to share.
    #[error("no room is being hosted")]
    NoRoom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_error() {
        let err = SessionError::NotYourTurn;
        let client_err: ChecklineError = err.into();
        assert!(matches!(client_err, ChecklineError::Session(_)));
        assert!(client_err.to_string().contains("turn"));
    }

    #[test]
    fn test_from_roster_error() {
        let err = RosterError::NameTaken("ada".into());
        let client_err: ChecklineError = err.into();
        assert!(matches!(client_err, ChecklineError::Roster(_)));
    }

    #[test]
    fn test_from_peer_error() {
        let err = PeerError::ConnectFailed("refused".into());
        let client_err: ChecklineError = err.into();
        assert!(matches!(client_err, ChecklineError::Peer(_)));
    }
}
