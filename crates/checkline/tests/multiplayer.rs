//! Two full clients talking over a loopback socket.

use std::time::Duration;

use checkline::{
    Client, ChecklineError, Color, LinkState, MoveSource, SessionEvent, SessionStatus, Square,
};
use checkline_oracle::{DifficultyProfile, MoveOracle, OracleError};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

/// Multiplayer never consults the oracle; fail loudly if it does.
struct NoOracle;

impl MoveOracle for NoOracle {
    async fn suggest(
        &self,
        _fen: &str,
        _profile: &DifficultyProfile,
    ) -> Result<String, OracleError> {
        panic!("oracle consulted during a multiplayer game");
    }
}

async fn next_event(events: &mut UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("event channel closed")
}

async fn wait_for_connected(events: &mut UnboundedReceiver<SessionEvent>) {
    loop {
        if matches!(
            next_event(events).await,
            SessionEvent::LinkChanged(LinkState::Connected)
        ) {
            return;
        }
    }
}

async fn wait_for_peer_move(events: &mut UnboundedReceiver<SessionEvent>) -> String {
    loop {
        if let SessionEvent::MoveApplied {
            source: MoveSource::Peer,
            mv,
        } = next_event(events).await
        {
            return mv.san;
        }
    }
}

async fn linked_pair() -> (
    Client,
    UnboundedReceiver<SessionEvent>,
    Client,
    UnboundedReceiver<SessionEvent>,
) {
    let (host, mut host_events) = Client::builder(NoOracle).build();
    let (guest, mut guest_events) = Client::builder(NoOracle).build();

    let identity = host.host_game().await.expect("host_game");
    guest.join_game(&identity).await.expect("join_game");

    wait_for_connected(&mut host_events).await;
    wait_for_connected(&mut guest_events).await;
    (host, host_events, guest, guest_events)
}

#[tokio::test]
async fn test_moves_flow_both_directions() {
    let (host, mut host_events, guest, mut guest_events) = linked_pair().await;

    host.play(Square::E2, Square::E4, None).await.unwrap();
    assert_eq!(wait_for_peer_move(&mut guest_events).await, "e4");

    guest.play(Square::E7, Square::E5, None).await.unwrap();
    assert_eq!(wait_for_peer_move(&mut host_events).await, "e5");

    let host_view = host.view().await.unwrap();
    let guest_view = guest.view().await.unwrap();
    assert_eq!(host_view.fen, guest_view.fen);
    assert_eq!(host_view.history, ["e4", "e5"]);
    assert!(!host_view.board_flipped);
    assert!(guest_view.board_flipped);
}

#[tokio::test]
async fn test_guest_resign_credits_host_win() {
    let (host, mut host_events, guest, _guest_events) = linked_pair().await;
    host.register("hostplayer", "pw").unwrap();

    guest.resign().await.unwrap();

    loop {
        if let SessionEvent::GameOver { status, local_won } = next_event(&mut host_events).await {
            assert_eq!(status, SessionStatus::OpponentResigned);
            assert!(local_won);
            break;
        }
    }
    // The pump records the win before forwarding GameOver.
    assert_eq!(host.active_player().unwrap().wins, 1);

    let guest_view = guest.view().await.unwrap();
    assert_eq!(guest_view.status, SessionStatus::LocalResigned);
}

#[tokio::test]
async fn test_share_link_carries_room_identity() {
    let (host, _events) = Client::builder(NoOracle).build();
    assert!(matches!(
        host.share_link("https://example.com/play"),
        Err(ChecklineError::NoRoom)
    ));

    let identity = host.host_game().await.unwrap();
    let link = host.share_link("https://example.com/play").unwrap();
    assert_eq!(link, format!("https://example.com/play?room={identity}"));
}

#[tokio::test]
async fn test_hosting_marks_link_searching_until_guest_arrives() {
    let (host, mut host_events) = Client::builder(NoOracle).build();
    let identity = host.host_game().await.unwrap();

    loop {
        if matches!(
            next_event(&mut host_events).await,
            SessionEvent::LinkChanged(LinkState::Searching)
        ) {
            break;
        }
    }
    let view = host.view().await.unwrap();
    assert_eq!(view.link, LinkState::Searching);
    // Still playable locally while the room waits.
    assert!(view.can_move);

    let (guest, _guest_events) = Client::builder(NoOracle).build();
    guest.join_game(&identity).await.unwrap();
    wait_for_connected(&mut host_events).await;
    assert_eq!(host.view().await.unwrap().link, LinkState::Connected);
}

#[tokio::test]
async fn test_join_failure_reports_link_offline() {
    let (client, mut events) = Client::builder(NoOracle).build();

    // Nothing listens here; the dial must fail and the link state must
    // settle back to offline rather than sticking at searching.
    let result = client.join_game("127.0.0.1:9").await;
    assert!(result.is_err());

    loop {
        if matches!(
            next_event(&mut events).await,
            SessionEvent::LinkChanged(LinkState::Offline)
        ) {
            break;
        }
    }
    assert_eq!(client.view().await.unwrap().link, LinkState::Offline);
}

#[tokio::test]
async fn test_host_shutdown_reverts_guest_to_bot_mode() {
    let (host, _host_events, guest, mut guest_events) = linked_pair().await;

    host.shutdown().await.unwrap();

    loop {
        if matches!(
            next_event(&mut guest_events).await,
            SessionEvent::LinkChanged(LinkState::Offline)
        ) {
            break;
        }
    }
    let view = guest.view().await.unwrap();
    assert_eq!(view.link, LinkState::Offline);
    assert!(view.history.is_empty());
    assert_eq!(view.turn, Color::White);
}

#[tokio::test]
async fn test_checkmate_over_the_wire_credits_winner() {
    // Fool's mate: the guest (Black) delivers Qh4#.
    let (host, mut host_events, guest, mut guest_events) = linked_pair().await;
    guest.register("guestplayer", "pw").unwrap();

    host.play(Square::F2, Square::F3, None).await.unwrap();
    wait_for_peer_move(&mut guest_events).await;
    guest.play(Square::E7, Square::E5, None).await.unwrap();
    wait_for_peer_move(&mut host_events).await;
    host.play(Square::G2, Square::G4, None).await.unwrap();
    wait_for_peer_move(&mut guest_events).await;
    guest.play(Square::D8, Square::H4, None).await.unwrap();

    loop {
        if let SessionEvent::GameOver { status, local_won } = next_event(&mut guest_events).await {
            assert_eq!(
                status,
                SessionStatus::Checkmate {
                    winner: Color::Black
                }
            );
            assert!(local_won);
            break;
        }
    }
    assert_eq!(guest.active_player().unwrap().wins, 1);

    loop {
        if let SessionEvent::GameOver { status, local_won } = next_event(&mut host_events).await {
            assert_eq!(
                status,
                SessionStatus::Checkmate {
                    winner: Color::Black
                }
            );
            assert!(!local_won);
            break;
        }
    }
    assert!(host.active_player().is_none());
}
