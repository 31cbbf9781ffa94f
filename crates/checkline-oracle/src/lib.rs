//! Move suggestion client for Checkline.
//!
//! The automated opponent's moves come from a remote text-generation
//! service. This crate provides:
//!
//! 1. **The [`MoveOracle`] trait** — one async method taking a FEN
//!    snapshot and a difficulty profile, returning a raw suggestion
//!    string. The session layer depends on the trait, so tests can
//!    script replies and production can talk HTTP.
//! 2. **[`Difficulty`] tiers** — four profiles varying persona
//!    strictness and randomness weight; the top tier additionally drops
//!    the fast-path hint to favor quality over latency.
//! 3. **[`ChatOracle`]** — a `reqwest`-based implementation against a
//!    chat-completion endpoint.
//! 4. **[`extract_san_token`]** — the rule for digging a SAN move out
//!    of a chatty reply.
//!
//! A suggestion may stall or fail; the session layer owns the fallback
//! (a random legal move) and the staleness check. Nothing here blocks
//! the game.

#![allow(async_fn_in_trait)]

mod chat;
mod difficulty;
mod error;
mod parse;

pub use chat::ChatOracle;
pub use difficulty::{Difficulty, DifficultyProfile};
pub use error::OracleError;
pub use parse::extract_san_token;

/// Produces a candidate move for the side to move in `fen`.
///
/// Implementations must be cancellation-safe: the caller may discard
/// the result (stale generation) or never poll it to completion.
pub trait MoveOracle: Send + Sync + 'static {
    /// Requests one candidate move, in (roughly) algebraic notation.
    ///
    /// The reply is raw model text; callers pass it through
    /// [`extract_san_token`] before trusting it.
    fn suggest(
        &self,
        fen: &str,
        profile: &DifficultyProfile,
    ) -> impl std::future::Future<Output = Result<String, OracleError>> + Send;
}
