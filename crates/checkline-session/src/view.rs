//! Read-only snapshot of a session.

use checkline_oracle::Difficulty;
use checkline_rules::{AppliedMove, Color};

use crate::{LinkState, Mode, SessionStatus};

/// A consistent snapshot of everything a presentation layer renders.
///
/// Taken inside the actor, so no field can be torn against another.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// The position as a FEN string.
    pub fen: String,
    /// The color to move.
    pub turn: Color,
    /// Derived status, resignation overrides included.
    pub status: SessionStatus,
    /// SAN history, oldest first.
    pub history: Vec<String>,
    /// The most recent move, for highlighting.
    pub last_move: Option<AppliedMove>,
    /// True while an engine turn is pending.
    pub thinking: bool,
    pub mode: Mode,
    pub link: LinkState,
    pub difficulty: Difficulty,
    /// True when the session would accept a local move right now.
    pub can_move: bool,
    /// True when the local player sits on the Black side, so the board
    /// should be drawn rotated.
    pub board_flipped: bool,
}
