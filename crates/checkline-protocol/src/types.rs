//! Message types for the peer channel.

use serde::{Deserialize, Serialize};

/// A message exchanged between two connected players.
///
/// Squares travel as coordinate text ("e2", "g8") and the promotion
/// piece as a single lowercase letter ("q", "n", ...); the session
/// layer owns the mapping to engine types. Keeping the wire format
/// string-based makes the protocol crate independent of the rules
/// engine and trivially inspectable in logs.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces
/// internally tagged JSON:
///   `{ "type": "move", "from": "e2", "to": "e4" }`
///   `{ "type": "resign" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMessage {
    /// A move made by the sending side.
    ///
    /// The receiver applies it as a trusted move for the color that is
    /// NOT its own; the rules engine still has the final say on
    /// legality.
    Move {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<String>,
    },

    /// The sending side resigns. Carries no payload.
    Resign,
}
