//! Session configuration.

use std::time::Duration;

use checkline_oracle::Difficulty;

/// Configuration for a session instance.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long an engine turn settles before the suggestion request is
    /// sent. User actions landing inside this window (resign, reset,
    /// mode switch) cancel the turn before any network traffic happens.
    pub ai_settle_delay: Duration,

    /// Initial engine difficulty. Can be changed at any time with
    /// [`SessionHandle::set_difficulty`](crate::SessionHandle::set_difficulty).
    pub difficulty: Difficulty,

    /// Command channel capacity — if it fills up, senders wait
    /// (bounded channel).
    pub channel_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ai_settle_delay: Duration::from_millis(400),
            difficulty: Difficulty::default(),
            channel_size: 32,
        }
    }
}
