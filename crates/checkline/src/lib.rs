//! # Checkline
//!
//! A chess client core: play against an AI opponent or another human
//! over a direct peer link, with local player accounts and win
//! tracking.
//!
//! The heart of the crate is the session actor in `checkline-session`:
//! it owns the board and serializes every mutation, so asynchronous
//! engine replies, peer traffic, and user actions can never interleave
//! into a corrupt game. This meta-crate wires the actor to the peer
//! transport and the roster and exposes the single [`Client`] type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkline::prelude::*;
//!
//! # async fn demo() -> Result<(), ChecklineError> {
//! let oracle = ChatOracle::new("https://api.example.com/v1/chat/completions", "model");
//! let (client, mut events) = Client::builder(oracle).build();
//!
//! client.play(Square::E2, Square::E4, None).await?;
//! while let Some(event) = events.recv().await {
//!     // render moves, thinking indicator, game over...
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{Client, ClientBuilder};
pub use error::ChecklineError;

pub use checkline_oracle::{ChatOracle, Difficulty, MoveOracle, OracleError};
pub use checkline_roster::{PlayerRecord, Roster, RosterError};
pub use checkline_rules::{Board, Color, Role, RulesError, Square};
pub use checkline_session::{
    LinkState, Mode, MoveSource, PeerRole, SessionConfig, SessionError, SessionEvent,
    SessionStatus, SessionView,
};

/// The common imports for embedding a client.
pub mod prelude {
    pub use crate::{
        ChatOracle, ChecklineError, Client, Color, Difficulty, LinkState, Mode, MoveSource,
        PeerRole, Role, SessionConfig, SessionEvent, SessionStatus, Square,
    };
}
