//! `Client` builder and the event pump.
//!
//! This is the entry point for embedding Checkline. It ties the layers
//! together: session actor → peer link → roster. The pump task watches
//! session events and drives the side effects — outbound peer traffic
//! and win recording — so embedders only consume the forwarded stream.

use std::sync::{Arc, Mutex as StdMutex};

use checkline_oracle::{Difficulty, MoveOracle};
use checkline_peer::{PeerLink, PeerListener};
use checkline_protocol::{Codec, JsonCodec, PeerMessage};
use checkline_roster::{PlayerRecord, Roster};
use checkline_rules::{Role, Square};
use checkline_session::{
    spawn_session, Mode, PeerRole, SessionConfig, SessionEvent, SessionHandle, SessionView,
};
use tokio::sync::{mpsc, Mutex};

use crate::ChecklineError;

/// Builder for configuring and starting a [`Client`].
///
/// # Example
///
/// ```rust,ignore
/// use checkline::prelude::*;
///
/// let oracle = ChatOracle::new(endpoint, model);
/// let (client, events) = Client::builder(oracle).build();
/// ```
pub struct ClientBuilder<O> {
    oracle: O,
    session_config: SessionConfig,
    roster: Roster,
    listen_addr: String,
}

impl<O: MoveOracle> ClientBuilder<O> {
    /// Creates a new builder around a move oracle.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            session_config: SessionConfig::default(),
            roster: Roster::in_memory(),
            listen_addr: "127.0.0.1:0".to_string(),
        }
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the player roster (load one from disk for persistence).
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Sets the address [`host_game`](Client::host_game) listens on.
    /// Use an `:0` port to let the OS pick one.
    pub fn listen_addr(mut self, addr: &str) -> Self {
        self.listen_addr = addr.to_string();
        self
    }

    /// Spawns the session actor and the event pump.
    ///
    /// Returns the client plus the forwarded event stream. Must be
    /// called from within a Tokio runtime.
    pub fn build(self) -> (Client, mpsc::UnboundedReceiver<SessionEvent>) {
        let (session, session_events) = spawn_session(self.session_config, self.oracle);
        let roster = Arc::new(StdMutex::new(self.roster));
        let link: Arc<Mutex<Option<PeerLink>>> = Arc::new(Mutex::new(None));
        let (forward_tx, forward_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_pump(
            session_events,
            Arc::clone(&link),
            Arc::clone(&roster),
            forward_tx,
        ));

        let client = Client {
            session,
            roster,
            link,
            listen_addr: self.listen_addr,
            room_identity: StdMutex::new(None),
        };
        (client, forward_rx)
    }
}

/// A running Checkline client: one session, an optional peer link, and
/// the local player roster.
pub struct Client {
    session: SessionHandle,
    roster: Arc<StdMutex<Roster>>,
    link: Arc<Mutex<Option<PeerLink>>>,
    listen_addr: String,
    room_identity: StdMutex<Option<String>>,
}

impl Client {
    /// Creates a new builder.
    pub fn builder<O: MoveOracle>(oracle: O) -> ClientBuilder<O> {
        ClientBuilder::new(oracle)
    }

    // --- game ---------------------------------------------------------

    /// Plays a local move.
    pub async fn play(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<(), ChecklineError> {
        self.session.play(from, to, promotion).await?;
        Ok(())
    }

    /// Resigns the current game.
    pub async fn resign(&self) -> Result<(), ChecklineError> {
        self.session.resign().await?;
        Ok(())
    }

    /// Starts a fresh game.
    pub async fn reset(&self) -> Result<(), ChecklineError> {
        self.session.reset().await?;
        Ok(())
    }

    /// Switches play mode.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), ChecklineError> {
        self.session.set_mode(mode).await?;
        Ok(())
    }

    /// Changes engine difficulty, effective from the next engine turn.
    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<(), ChecklineError> {
        self.session.set_difficulty(difficulty).await?;
        Ok(())
    }

    /// Takes a consistent snapshot of the session state.
    pub async fn view(&self) -> Result<SessionView, ChecklineError> {
        Ok(self.session.view().await?)
    }

    /// Legal destination squares from `from`; empty when the local
    /// player may not move right now.
    pub async fn legal_targets(&self, from: Square) -> Result<Vec<Square>, ChecklineError> {
        Ok(self.session.legal_targets(from).await?)
    }

    // --- multiplayer --------------------------------------------------

    /// Opens a room and returns its shareable identity.
    ///
    /// The call returns as soon as the listener is bound; the session
    /// switches to multiplayer (local player as White) when a guest
    /// actually connects.
    pub async fn host_game(&self) -> Result<String, ChecklineError> {
        let mut listener = PeerListener::bind(&self.listen_addr).await?;
        let identity = listener.identity().to_string();
        *self.room_identity.lock().unwrap() = Some(identity.clone());
        self.session.link_searching().await?;

        let session = self.session.clone();
        let slot = Arc::clone(&self.link);
        tokio::spawn(async move {
            match listener.accept().await {
                Ok(link) => {
                    attach_link(&slot, &session, link, PeerRole::Host).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "guest failed to connect");
                    let _ = session.link_closed().await;
                }
            }
        });

        Ok(identity)
    }

    /// Joins a room by the identity its host shared. The local player
    /// plays Black.
    pub async fn join_game(&self, identity: &str) -> Result<(), ChecklineError> {
        self.session.link_searching().await?;
        let link = match checkline_peer::connect(identity).await {
            Ok(link) => link,
            Err(e) => {
                let _ = self.session.link_closed().await;
                return Err(e.into());
            }
        };
        attach_link(&self.link, &self.session, link, PeerRole::Guest).await;
        Ok(())
    }

    /// An invite URL for the currently hosted room.
    pub fn share_link(&self, base: &str) -> Result<String, ChecklineError> {
        let identity = self.room_identity.lock().unwrap();
        let identity = identity.as_deref().ok_or(ChecklineError::NoRoom)?;
        Ok(format!("{base}?room={identity}"))
    }

    // --- players ------------------------------------------------------

    /// Registers a new player and signs them in.
    pub fn register(&self, name: &str, credential: &str) -> Result<PlayerRecord, ChecklineError> {
        Ok(self.roster.lock().unwrap().register(name, credential)?.clone())
    }

    /// Signs in an existing player.
    pub fn login(&self, name: &str, credential: &str) -> Result<PlayerRecord, ChecklineError> {
        Ok(self.roster.lock().unwrap().login(name, credential)?.clone())
    }

    /// Signs the active player out.
    pub fn logout(&self) {
        self.roster.lock().unwrap().logout();
    }

    /// The currently signed-in player, if any.
    pub fn active_player(&self) -> Option<PlayerRecord> {
        self.roster.lock().unwrap().active().cloned()
    }

    /// Every player record, best first.
    pub fn leaderboard(&self) -> Vec<PlayerRecord> {
        self.roster
            .lock()
            .unwrap()
            .leaderboard()
            .into_iter()
            .cloned()
            .collect()
    }

    // --- lifecycle ----------------------------------------------------

    /// Closes the peer link (if any) and stops the session actor.
    pub async fn shutdown(&self) -> Result<(), ChecklineError> {
        if let Some(link) = self.link.lock().await.take() {
            let _ = link.close().await;
        }
        self.session.shutdown().await?;
        Ok(())
    }
}

/// Installs a live link: stores it for the pump's outbound sends,
/// tells the session, and starts the inbound reader.
async fn attach_link(
    slot: &Arc<Mutex<Option<PeerLink>>>,
    session: &SessionHandle,
    link: PeerLink,
    role: PeerRole,
) {
    *slot.lock().await = Some(link.clone());
    if session.link_opened(role).await.is_err() {
        return;
    }
    tokio::spawn(run_reader(link, session.clone(), Arc::clone(slot)));
}

/// Forwards inbound peer traffic into the session until the link dies,
/// then reports the disconnect.
async fn run_reader(
    link: PeerLink,
    session: SessionHandle,
    slot: Arc<Mutex<Option<PeerLink>>>,
) {
    let codec = JsonCodec;
    loop {
        match link.recv().await {
            Ok(Some(bytes)) => match codec.decode::<PeerMessage>(&bytes) {
                Ok(msg) => {
                    if session.peer_message(msg).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable peer message, ignoring");
                }
            },
            Ok(None) => {
                tracing::info!("peer closed the link");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "peer link failed");
                break;
            }
        }
    }
    *slot.lock().await = None;
    let _ = session.link_closed().await;
}

/// Consumes session events, performs their side effects, and forwards
/// them to the embedder.
async fn run_pump(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    link: Arc<Mutex<Option<PeerLink>>>,
    roster: Arc<StdMutex<Roster>>,
    forward: mpsc::UnboundedSender<SessionEvent>,
) {
    let codec = JsonCodec;
    while let Some(event) = events.recv().await {
        match &event {
            SessionEvent::Transmit(msg) => {
                let live = link.lock().await.clone();
                match live {
                    Some(link) => match codec.encode(msg) {
                        Ok(bytes) => {
                            if let Err(e) = link.send(&bytes).await {
                                tracing::warn!(error = %e, "failed to send to peer");
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "failed to encode peer message"),
                    },
                    None => tracing::debug!("transmit with no live link, dropping"),
                }
            }
            SessionEvent::GameOver {
                local_won: true, ..
            } => {
                // Recording happens before the event is forwarded, so
                // an observer of GameOver sees the updated win count.
                if let Some(wins) = roster.lock().unwrap().record_win() {
                    tracing::debug!(wins, "win credited");
                }
            }
            _ => {}
        }
        let _ = forward.send(event);
    }
}
