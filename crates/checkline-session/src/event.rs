//! Events the session actor pushes to its owner.

use checkline_protocol::PeerMessage;
use checkline_rules::AppliedMove;

use crate::{LinkState, SessionStatus};

/// Who produced a move that reached the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// The local player.
    Local,
    /// The engine (suggestion service or its random fallback).
    Engine,
    /// The remote player over the peer link.
    Peer,
}

/// An outbound notification from the session actor.
///
/// The owner drives side effects off these: `Transmit` goes to the
/// peer link, `GameOver` with `local_won` feeds the win roster, the
/// rest update the presentation.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A move was applied to the board.
    MoveApplied { source: MoveSource, mv: AppliedMove },

    /// Send this message to the remote peer.
    Transmit(PeerMessage),

    /// The engine-turn indicator changed.
    Thinking(bool),

    /// The game ended. Emitted at most once per game; `local_won` is
    /// the exactly-once signal for win recording.
    GameOver {
        status: SessionStatus,
        local_won: bool,
    },

    /// The peer link went up or down.
    LinkChanged(LinkState),

    /// The board was reset to the starting position.
    Reset,
}
