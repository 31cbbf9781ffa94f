//! Point-to-point peer channel for Checkline.
//!
//! Connection establishment is asymmetric: the **host** binds a
//! [`PeerListener`] and shares its identity (a `host:port` string)
//! out-of-band — typically baked into a join link; the **guest** calls
//! [`connect`] with that identity. Both ends converge on the same
//! [`PeerLink`] type: a reliable ordered byte channel.
//!
//! The channel carries opaque bytes; framing and meaning belong to the
//! protocol layer above. A `recv` returning `Ok(None)` is the close
//! event.

mod error;
mod link;

pub use error::PeerError;
pub use link::{connect, PeerLink, PeerListener};
