//! Commands sent to the session actor, and the public handle.

use checkline_oracle::{Difficulty, OracleError};
use checkline_protocol::PeerMessage;
use checkline_rules::{Role, Square};
use tokio::sync::{mpsc, oneshot};

use crate::{Mode, PeerRole, SessionError, SessionView};

/// Commands processed by the session actor.
///
/// The `oneshot::Sender` in some variants is a reply channel: the
/// caller sends the command and waits for the response on it.
/// `EngineTurn` and `EngineReply` are internal, posted back into the
/// inbox by tasks the actor itself spawned; their `generation` tag is
/// what lets the actor discard results that a resign, reset, or mode
/// switch has since invalidated.
pub(crate) enum SessionCommand {
    /// A move by the local player.
    Play {
        from: Square,
        to: Square,
        promotion: Option<Role>,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },

    /// The local player resigns.
    Resign,

    /// Start a fresh game.
    Reset,

    /// Switch play mode.
    SetMode { mode: Mode },

    /// Change engine difficulty.
    SetDifficulty { difficulty: Difficulty },

    /// Link establishment started (room opened or connect initiated).
    LinkSearching,

    /// A peer link came up with the local player in `role`.
    LinkOpened { role: PeerRole },

    /// The peer link went down.
    LinkClosed,

    /// A message arrived from the remote peer.
    Peer { msg: PeerMessage },

    /// Legal destinations from a square, gated on movability.
    LegalTargets {
        from: Square,
        reply: oneshot::Sender<Vec<Square>>,
    },

    /// Request a state snapshot.
    View {
        reply: oneshot::Sender<SessionView>,
    },

    /// The settle delay for an engine turn elapsed.
    EngineTurn { generation: u64 },

    /// A suggestion request finished.
    EngineReply {
        generation: u64,
        result: Result<String, OracleError>,
    },

    /// Shut down the session.
    Shutdown,
}

/// Handle to a running session actor.
///
/// Cheap to clone — just an `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(sender: mpsc::Sender<SessionCommand>) -> Self {
        Self { sender }
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Stopped)
    }

    /// Plays a local move and waits for the verdict.
    pub async fn play(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Play {
            from,
            to,
            promotion,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| SessionError::Stopped)?
    }

    /// Resigns the current game (fire-and-forget).
    pub async fn resign(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Resign).await
    }

    /// Starts a fresh game.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Reset).await
    }

    /// Switches play mode. A mode change starts a fresh game.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), SessionError> {
        self.send(SessionCommand::SetMode { mode }).await
    }

    /// Changes engine difficulty, effective from the next engine turn.
    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<(), SessionError> {
        self.send(SessionCommand::SetDifficulty { difficulty }).await
    }

    /// Reports that link establishment started: a room is open and
    /// waiting for a guest, or a connect is in progress.
    pub async fn link_searching(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::LinkSearching).await
    }

    /// Reports a peer link coming up with the local player in `role`.
    pub async fn link_opened(&self, role: PeerRole) -> Result<(), SessionError> {
        self.send(SessionCommand::LinkOpened { role }).await
    }

    /// Reports the peer link going down.
    pub async fn link_closed(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::LinkClosed).await
    }

    /// Delivers a message received from the remote peer.
    pub async fn peer_message(&self, msg: PeerMessage) -> Result<(), SessionError> {
        self.send(SessionCommand::Peer { msg }).await
    }

    /// Legal destination squares from `from`; empty when the local
    /// player may not move right now.
    pub async fn legal_targets(&self, from: Square) -> Result<Vec<Square>, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::LegalTargets {
            from,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| SessionError::Stopped)
    }

    /// Takes a consistent snapshot of the session state.
    pub async fn view(&self) -> Result<SessionView, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::View { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SessionError::Stopped)
    }

    /// Tells the session to shut down.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }
}
