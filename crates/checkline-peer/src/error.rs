//! Error types for the peer channel.

/// Errors that can occur on the peer channel.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Binding the listening socket failed.
    #[error("listen failed: {0}")]
    ListenFailed(#[source] std::io::Error),

    /// Accepting an inbound peer failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Connecting to the host identity failed (bad identity, host gone,
    /// or the WebSocket handshake was rejected).
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Sending data failed; the link is effectively dead.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}
