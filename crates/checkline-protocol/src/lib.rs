//! Wire protocol for the Checkline peer channel.
//!
//! This crate defines the "language" two connected players speak:
//!
//! - **Types** ([`PeerMessage`]) — the two message kinds that travel on
//!   the wire between host and guest.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between the peer transport (raw bytes) and
//! the session orchestrator (game semantics). It knows nothing about
//! connections or legality — only message shape.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::PeerMessage;
