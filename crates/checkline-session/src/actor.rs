//! Session actor: an isolated Tokio task that owns one game.

use std::sync::Arc;

use checkline_oracle::{extract_san_token, Difficulty, MoveOracle, OracleError};
use checkline_protocol::PeerMessage;
use checkline_rules::{Board, Color, Role, Square};
use tokio::sync::mpsc;

use crate::command::{SessionCommand, SessionHandle};
use crate::{
    LinkState, Mode, MoveSource, PeerRole, SessionConfig, SessionError, SessionEvent,
    SessionStatus, SessionView,
};

/// The internal session actor state. Runs inside a Tokio task.
struct SessionActor<O> {
    board: Board,
    mode: Mode,
    link: LinkState,
    difficulty: Difficulty,
    /// True from the moment an engine turn is scheduled until its
    /// result (or fallback) lands or the turn is invalidated.
    thinking: bool,
    /// Bumped by resign, reset, mode switch, and link changes. Engine
    /// work tagged with an older value is dropped on arrival.
    generation: u64,
    /// Latch for the one `GameOver` event per game.
    outcome_reported: bool,
    override_status: Option<SessionStatus>,
    last_move: Option<checkline_rules::AppliedMove>,
    config: SessionConfig,
    oracle: Arc<O>,
    events: mpsc::UnboundedSender<SessionEvent>,
    /// Own inbox sender, cloned into the settle-delay and request tasks.
    sender: mpsc::Sender<SessionCommand>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<O: MoveOracle> SessionActor<O> {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!("session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Play {
                    from,
                    to,
                    promotion,
                    reply,
                } => {
                    let result = self.handle_play(from, to, promotion);
                    let _ = reply.send(result);
                }
                SessionCommand::Resign => self.handle_resign(),
                SessionCommand::Reset => self.handle_reset(),
                SessionCommand::SetMode { mode } => self.handle_set_mode(mode),
                SessionCommand::SetDifficulty { difficulty } => {
                    tracing::info!(%difficulty, "difficulty changed");
                    self.difficulty = difficulty;
                }
                SessionCommand::LinkSearching => self.handle_link_searching(),
                SessionCommand::LinkOpened { role } => self.handle_link_opened(role),
                SessionCommand::LinkClosed => self.handle_link_closed(),
                SessionCommand::Peer { msg } => self.handle_peer(msg),
                SessionCommand::LegalTargets { from, reply } => {
                    let _ = reply.send(self.legal_targets(from));
                }
                SessionCommand::View { reply } => {
                    let _ = reply.send(self.view());
                }
                SessionCommand::EngineTurn { generation } => {
                    self.handle_engine_turn(generation);
                }
                SessionCommand::EngineReply { generation, result } => {
                    self.handle_engine_reply(generation, result);
                }
                SessionCommand::Shutdown => {
                    tracing::info!("session shutting down");
                    break;
                }
            }
        }

        tracing::info!("session actor stopped");
    }

    fn handle_play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<(), SessionError> {
        if self.game_over() {
            return Err(SessionError::GameOver);
        }
        match self.mode {
            Mode::Bot => {
                if self.thinking {
                    return Err(SessionError::EngineThinking);
                }
                if self.board.turn() != Color::White {
                    return Err(SessionError::NotYourTurn);
                }
            }
            Mode::Multiplayer { role } => {
                if self.link != LinkState::Connected {
                    return Err(SessionError::NotConnected);
                }
                if self.board.turn() != role.color() {
                    return Err(SessionError::NotYourTurn);
                }
            }
        }

        let mv = self.board.apply(from, to, promotion)?;
        if let Mode::Multiplayer { .. } = self.mode {
            self.emit(SessionEvent::Transmit(PeerMessage::Move {
                from: mv.from.to_string(),
                to: mv.to.to_string(),
                promotion: promotion.map(|r| r.char().to_string()),
            }));
        }
        self.last_move = Some(mv.clone());
        self.emit(SessionEvent::MoveApplied {
            source: MoveSource::Local,
            mv,
        });
        self.after_move();
        Ok(())
    }

    /// Shared tail of every applied move: report a finished game, or
    /// hand the turn to the engine in bot mode.
    fn after_move(&mut self) {
        if self.board.is_game_over() {
            self.report_outcome();
        } else if self.mode == Mode::Bot && self.board.turn() == Color::Black {
            self.schedule_engine_turn();
        }
    }

    /// Starts the settle delay for an engine turn. The generation
    /// captured here is checked again when the delay elapses and once
    /// more when the suggestion arrives.
    fn schedule_engine_turn(&mut self) {
        self.set_thinking(true);
        let generation = self.generation;
        let delay = self.config.ai_settle_delay;
        let tx = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionCommand::EngineTurn { generation }).await;
        });
    }

    fn handle_engine_turn(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale engine turn");
            return;
        }
        let fen = self.board.fen();
        let profile = self.difficulty.profile();
        let oracle = Arc::clone(&self.oracle);
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = oracle.suggest(&fen, &profile).await;
            let _ = tx
                .send(SessionCommand::EngineReply { generation, result })
                .await;
        });
    }

    fn handle_engine_reply(&mut self, generation: u64, result: Result<String, OracleError>) {
        if generation != self.generation {
            // The game this reply was computed for no longer exists.
            tracing::debug!(generation, current = self.generation, "stale suggestion");
            return;
        }
        self.set_thinking(false);

        let suggested = match result {
            Ok(reply) => match extract_san_token(&reply) {
                Some(san) => match self.board.apply_san(&san) {
                    Ok(mv) => Some(mv),
                    Err(e) => {
                        tracing::warn!(%san, error = %e, "suggestion rejected by rules");
                        None
                    }
                },
                None => {
                    tracing::warn!("no move token in suggestion");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "suggestion request failed");
                None
            }
        };
        let mv = match suggested {
            Some(mv) => mv,
            // Any failure degrades to a random legal move rather than
            // stalling the game.
            None => match self.board.apply_random(&mut rand::rng()) {
                Some(mv) => mv,
                None => {
                    tracing::error!("engine turn with no legal moves");
                    return;
                }
            },
        };

        self.last_move = Some(mv.clone());
        self.emit(SessionEvent::MoveApplied {
            source: MoveSource::Engine,
            mv,
        });
        self.after_move();
    }

    fn handle_resign(&mut self) {
        if self.game_over() {
            return;
        }
        self.generation += 1;
        self.set_thinking(false);
        // Transmit before freezing, so the peer learns of the
        // resignation even though no further local state changes.
        if self.mode != Mode::Bot && self.link == LinkState::Connected {
            self.emit(SessionEvent::Transmit(PeerMessage::Resign));
        }
        self.override_status = Some(SessionStatus::LocalResigned);
        self.report_outcome();
    }

    fn handle_peer(&mut self, msg: PeerMessage) {
        let Mode::Multiplayer { role } = self.mode else {
            tracing::warn!("peer message outside multiplayer mode, ignoring");
            return;
        };
        match msg {
            PeerMessage::Move {
                from,
                to,
                promotion,
            } => {
                if self.game_over() {
                    tracing::debug!("peer move after game end, ignoring");
                    return;
                }
                if self.board.turn() == role.color() {
                    tracing::warn!(%from, %to, "peer move out of turn, ignoring");
                    return;
                }
                let (Ok(from_sq), Ok(to_sq)) =
                    (from.parse::<Square>(), to.parse::<Square>())
                else {
                    tracing::warn!(%from, %to, "unparseable peer move, ignoring");
                    return;
                };
                let promo = promotion
                    .as_deref()
                    .and_then(|s| s.chars().next())
                    .and_then(Role::from_char);
                match self.board.apply(from_sq, to_sq, promo) {
                    Ok(mv) => {
                        self.last_move = Some(mv.clone());
                        self.emit(SessionEvent::MoveApplied {
                            source: MoveSource::Peer,
                            mv,
                        });
                        self.after_move();
                    }
                    Err(e) => {
                        tracing::warn!(%from, %to, error = %e, "illegal peer move, ignoring");
                    }
                }
            }
            PeerMessage::Resign => {
                if self.game_over() {
                    return;
                }
                self.generation += 1;
                self.set_thinking(false);
                self.override_status = Some(SessionStatus::OpponentResigned);
                self.report_outcome();
            }
        }
    }

    fn handle_reset(&mut self) {
        self.generation += 1;
        self.set_thinking(false);
        self.board.reset();
        self.override_status = None;
        self.outcome_reported = false;
        self.last_move = None;
        self.emit(SessionEvent::Reset);
    }

    fn handle_set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        tracing::info!(?mode, "mode changed");
        self.mode = mode;
        if self.mode == Mode::Bot && self.link == LinkState::Connected {
            self.link = LinkState::Offline;
            self.emit(SessionEvent::LinkChanged(LinkState::Offline));
        }
        self.handle_reset();
    }

    /// Establishment started: the room is open, or a connect is in
    /// flight. The current game (bot play, typically) keeps running
    /// until the link actually comes up.
    fn handle_link_searching(&mut self) {
        if self.link == LinkState::Connected {
            tracing::warn!("search reported over a live link, ignoring");
            return;
        }
        if self.link == LinkState::Searching {
            return;
        }
        tracing::info!("searching for a peer");
        self.link = LinkState::Searching;
        self.emit(SessionEvent::LinkChanged(LinkState::Searching));
    }

    /// Both sides start a fresh game the moment the link comes up.
    fn handle_link_opened(&mut self, role: PeerRole) {
        tracing::info!(?role, "peer link opened");
        self.mode = Mode::Multiplayer { role };
        self.link = LinkState::Connected;
        self.emit(SessionEvent::LinkChanged(LinkState::Connected));
        self.handle_reset();
    }

    /// A dropped link falls back to bot mode with a fresh board. An
    /// abandoned search just goes back offline; the game in progress
    /// never left bot mode, so it stays as it is.
    fn handle_link_closed(&mut self) {
        if self.link == LinkState::Offline && self.mode == Mode::Bot {
            return;
        }
        tracing::info!("peer link closed");
        let was_searching = self.link == LinkState::Searching && self.mode == Mode::Bot;
        self.link = LinkState::Offline;
        self.emit(SessionEvent::LinkChanged(LinkState::Offline));
        if was_searching {
            return;
        }
        self.mode = Mode::Bot;
        self.handle_reset();
    }

    /// Emits the single `GameOver` for this game. The latch survives
    /// everything except a reset, so duplicate terminal triggers (a
    /// repeated peer resign, a view refresh) cannot double-count a win.
    fn report_outcome(&mut self) {
        if self.outcome_reported {
            return;
        }
        self.outcome_reported = true;
        let status = self.status();
        let local_won = status == SessionStatus::OpponentResigned
            || matches!(status, SessionStatus::Checkmate { winner }
                if winner == self.mode.local_color());
        tracing::info!(%status, local_won, "game over");
        self.emit(SessionEvent::GameOver { status, local_won });
    }

    fn status(&self) -> SessionStatus {
        if let Some(status) = self.override_status {
            return status;
        }
        if self.board.is_checkmate() {
            SessionStatus::Checkmate {
                winner: self.board.turn().other(),
            }
        } else if self.board.is_draw() {
            SessionStatus::Draw
        } else if self.board.is_check() {
            SessionStatus::Check
        } else {
            SessionStatus::Playing
        }
    }

    fn game_over(&self) -> bool {
        self.override_status.is_some() || self.board.is_game_over()
    }

    fn can_move(&self) -> bool {
        if self.game_over() {
            return false;
        }
        match self.mode {
            Mode::Bot => !self.thinking && self.board.turn() == Color::White,
            Mode::Multiplayer { role } => {
                self.link == LinkState::Connected && self.board.turn() == role.color()
            }
        }
    }

    fn legal_targets(&self, from: Square) -> Vec<Square> {
        if !self.can_move() {
            return Vec::new();
        }
        self.board.legal_targets(from)
    }

    fn view(&self) -> SessionView {
        SessionView {
            fen: self.board.fen(),
            turn: self.board.turn(),
            status: self.status(),
            history: self.board.history().to_vec(),
            last_move: self.last_move.clone(),
            thinking: self.thinking,
            mode: self.mode,
            link: self.link,
            difficulty: self.difficulty,
            can_move: self.can_move(),
            board_flipped: self.mode.local_color() == Color::Black,
        }
    }

    fn set_thinking(&mut self, thinking: bool) {
        if self.thinking != thinking {
            self.thinking = thinking;
            self.emit(SessionEvent::Thinking(thinking));
        }
    }

    /// Sends an event to the owner. Silently drops if the receiver is
    /// gone (owner shutting down).
    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

/// Spawns a session actor task.
///
/// Returns the handle for commands and the receiver for events. The
/// actor runs until told to [`shutdown`](SessionHandle::shutdown).
pub fn spawn_session<O>(
    config: SessionConfig,
    oracle: O,
) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>)
where
    O: MoveOracle,
{
    let (tx, rx) = mpsc::channel(config.channel_size);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let actor = SessionActor {
        board: Board::new(),
        mode: Mode::Bot,
        link: LinkState::Offline,
        difficulty: config.difficulty,
        thinking: false,
        generation: 0,
        outcome_reported: false,
        override_status: None,
        last_move: None,
        config,
        oracle: Arc::new(oracle),
        events: event_tx,
        sender: tx.clone(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    (SessionHandle::new(tx), event_rx)
}
