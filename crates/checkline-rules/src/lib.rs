//! Rules adapter for Checkline.
//!
//! Wraps the `shakmaty` engine behind a small mutable handle, [`Board`].
//! The session layer above never inspects position internals — it only
//! queries and mutates through this crate's contract:
//!
//! - legal-move queries for a square
//! - move application by coordinates or by SAN text
//! - game-over predicates (checkmate, draw, check)
//! - FEN snapshot and SAN move history
//!
//! ```text
//! Session Layer (above)  ← owns one Board, serializes all mutations
//!     ↕
//! Rules Layer (this crate)  ← legality, notation, terminal detection
//! ```

mod board;
mod error;

pub use board::{AppliedMove, Board};
pub use error::RulesError;

// The session and presentation layers speak in these engine types;
// re-exporting them keeps shakmaty out of their dependency lists.
pub use shakmaty::{Color, Role, Square};
