//! Player identity and win bookkeeping.
//!
//! A [`Roster`] holds every registered player, remembers which one is
//! currently signed in, and keeps per-player win counts. It can run
//! purely in memory (tests, anonymous play) or be backed by a JSON file
//! that is rewritten after every mutation, so a crash between games
//! loses at most the game in progress.

mod error;
mod roster;

pub use error::RosterError;
pub use roster::{PlayerRecord, Roster};
