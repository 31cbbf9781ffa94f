//! The game session orchestrator.
//!
//! A session is an isolated Tokio task that owns one game: the board,
//! the play mode, the link to a remote peer, and the pending engine
//! request. Everything else talks to it through an mpsc channel — the
//! actor model, no shared mutable state.
//!
//! The hard part this crate exists for is the race surface around
//! asynchronous engine moves: a suggestion request is in flight while
//! the user can resign, reset, or lose the peer link. Each of those
//! bumps a generation counter; a reply tagged with an older generation
//! is discarded without touching the board.

mod actor;
mod command;
mod config;
mod error;
mod event;
mod state;
mod view;

pub use actor::spawn_session;
pub use command::SessionHandle;
pub use config::SessionConfig;
pub use error::SessionError;
pub use event::{MoveSource, SessionEvent};
pub use state::{LinkState, Mode, PeerRole, SessionStatus};
pub use view::SessionView;
