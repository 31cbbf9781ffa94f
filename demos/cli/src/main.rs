//! Terminal chess client.
//!
//! Commands:
//!   move <from><to>[piece]   play a move, e.g. `move e2e4`, `move b7a8n`
//!   targets <square>         show legal destinations, e.g. `targets e2`
//!   board                    print the board
//!   resign / reset           end or restart the game
//!   difficulty <tier>        easy | medium | hard | insane
//!   host                     open a room and print the invite
//!   join <identity>          join a hosted room
//!   register <name> <pw>     create a player and sign in
//!   login <name> <pw>        sign in
//!   logout / top             sign out / show the leaderboard
//!   quit
//!
//! The suggestion service is read from `CHECKLINE_ORACLE_URL`,
//! `CHECKLINE_ORACLE_MODEL`, and `CHECKLINE_ORACLE_KEY`. Without them
//! every engine turn falls back to a random legal move, which is still
//! a playable (if weak) opponent.

use checkline::prelude::*;
use checkline::{Roster, SessionView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let endpoint = std::env::var("CHECKLINE_ORACLE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:0/unconfigured".into());
    let model = std::env::var("CHECKLINE_ORACLE_MODEL").unwrap_or_else(|_| "default".into());
    let mut oracle = ChatOracle::new(endpoint, model);
    if let Ok(key) = std::env::var("CHECKLINE_ORACLE_KEY") {
        oracle = oracle.with_api_key(key);
    }

    let roster = match std::env::var("CHECKLINE_ROSTER") {
        Ok(path) => Roster::load(path)?,
        Err(_) => Roster::in_memory(),
    };

    let (client, events) = Client::builder(oracle).roster(roster).build();

    println!("checkline: type `help` for commands");
    print_board(&client.view().await?);

    let input = BufReader::new(tokio::io::stdin());
    run(client, events, input).await
}

async fn run(
    client: Client,
    mut events: UnboundedReceiver<SessionEvent>,
    input: BufReader<tokio::io::Stdin>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = input.lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                report(&client, event).await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(&client, line.trim()).await {
                    break;
                }
            }
        }
    }
    client.shutdown().await?;
    Ok(())
}

/// Prints what just happened. Quiet about plumbing events.
async fn report(client: &Client, event: SessionEvent) {
    match event {
        SessionEvent::MoveApplied { source, mv } => {
            let who = match source {
                MoveSource::Local => "you",
                MoveSource::Engine => "engine",
                MoveSource::Peer => "opponent",
            };
            println!("{who}: {}", mv.san);
            if source != MoveSource::Local {
                if let Ok(view) = client.view().await {
                    print_board(&view);
                }
            }
        }
        SessionEvent::Thinking(true) => println!("engine is thinking..."),
        SessionEvent::Thinking(false) => {}
        SessionEvent::GameOver { status, .. } => println!("game over: {status}"),
        SessionEvent::LinkChanged(LinkState::Searching) => println!("looking for an opponent..."),
        SessionEvent::LinkChanged(LinkState::Connected) => println!("opponent connected"),
        SessionEvent::LinkChanged(LinkState::Offline) => {
            println!("opponent disconnected, back to bot play");
        }
        SessionEvent::Reset => println!("new game"),
        SessionEvent::Transmit(_) => {}
    }
}

/// Handles one command line. Returns `false` to exit.
async fn dispatch(client: &Client, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let result = match (parts.next(), parts.next(), parts.next()) {
        (None, ..) => Ok(()),
        (Some("quit"), ..) | (Some("exit"), ..) => return false,
        (Some("help"), ..) => {
            println!("move, targets, board, resign, reset, difficulty, host, join,");
            println!("register, login, logout, top, quit");
            Ok(())
        }
        (Some("move"), Some(mv), None) => play(client, mv).await,
        (Some("targets"), Some(sq), None) => targets(client, sq).await,
        (Some("board"), ..) => match client.view().await {
            Ok(view) => {
                print_board(&view);
                Ok(())
            }
            Err(e) => Err(e),
        },
        (Some("resign"), ..) => client.resign().await,
        (Some("reset"), ..) => client.reset().await,
        (Some("difficulty"), Some(name), None) => match Difficulty::from_name(name) {
            Some(tier) => client.set_difficulty(tier).await,
            None => {
                println!("unknown tier: {name}");
                Ok(())
            }
        },
        (Some("host"), ..) => match client.host_game().await {
            Ok(identity) => {
                println!("waiting for an opponent; they should run: join {identity}");
                Ok(())
            }
            Err(e) => Err(e),
        },
        (Some("join"), Some(identity), None) => client.join_game(identity).await,
        (Some("register"), Some(name), Some(pw)) => match client.register(name, pw) {
            Ok(player) => {
                println!("welcome, {}", player.name);
                Ok(())
            }
            Err(e) => Err(e),
        },
        (Some("login"), Some(name), Some(pw)) => match client.login(name, pw) {
            Ok(player) => {
                println!("welcome back, {} ({} wins)", player.name, player.wins);
                Ok(())
            }
            Err(e) => Err(e),
        },
        (Some("logout"), ..) => {
            client.logout();
            Ok(())
        }
        (Some("top"), ..) => {
            for player in client.leaderboard() {
                println!("{:>4}  {}", player.wins, player.name);
            }
            Ok(())
        }
        (Some(other), ..) => {
            println!("unknown command: {other} (try `help`)");
            Ok(())
        }
    };
    if let Err(e) = result {
        println!("error: {e}");
    }
    true
}

async fn play(client: &Client, mv: &str) -> Result<(), ChecklineError> {
    let Some((from, to, promotion)) = parse_move(mv) else {
        println!("moves look like e2e4 or b7a8n");
        return Ok(());
    };
    client.play(from, to, promotion).await
}

async fn targets(client: &Client, sq: &str) -> Result<(), ChecklineError> {
    let Ok(from) = sq.parse::<Square>() else {
        println!("not a square: {sq}");
        return Ok(());
    };
    let targets = client.legal_targets(from).await?;
    if targets.is_empty() {
        println!("no moves from {from}");
    } else {
        let names: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
        println!("{from}: {}", names.join(" "));
    }
    Ok(())
}

/// Parses `e2e4` or `b7a8n` into squares plus an optional promotion.
fn parse_move(text: &str) -> Option<(Square, Square, Option<Role>)> {
    // Byte offsets are only square boundaries for ASCII input; anything
    // else cannot name a square anyway.
    if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
        return None;
    }
    let from = text[..2].parse::<Square>().ok()?;
    let to = text[2..4].parse::<Square>().ok()?;
    let promotion = match text.len() {
        5 => Some(Role::from_char(text.chars().nth(4)?)?),
        _ => None,
    };
    Some((from, to, promotion))
}

/// Renders the position, rotated when the local player is Black.
fn print_board(view: &SessionView) {
    let placement = view.fen.split_whitespace().next().unwrap_or("");
    let mut ranks: Vec<String> = Vec::with_capacity(8);
    for rank in placement.split('/') {
        let mut row = String::new();
        for c in rank.chars() {
            if let Some(n) = c.to_digit(10) {
                for _ in 0..n {
                    row.push_str(". ");
                }
            } else {
                row.push(c);
                row.push(' ');
            }
        }
        ranks.push(row);
    }

    let files: &str = if view.board_flipped {
        "    h g f e d c b a"
    } else {
        "    a b c d e f g h"
    };
    if view.board_flipped {
        for (i, row) in ranks.iter().enumerate().rev() {
            let reversed: String = row
                .split_whitespace()
                .rev()
                .map(|s| format!("{s} "))
                .collect();
            println!("  {} {reversed}", 8 - i);
        }
    } else {
        for (i, row) in ranks.iter().enumerate() {
            println!("  {} {row}", 8 - i);
        }
    }
    println!("{files}");
    println!("  {} to move ({})", color_name(view.turn), view.status);
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_coordinates() {
        let (from, to, promo) = parse_move("e2e4").unwrap();
        assert_eq!(from, Square::E2);
        assert_eq!(to, Square::E4);
        assert_eq!(promo, None);
    }

    #[test]
    fn test_parse_move_with_promotion() {
        let (from, to, promo) = parse_move("b7a8n").unwrap();
        assert_eq!(from, Square::B7);
        assert_eq!(to, Square::A8);
        assert_eq!(promo, Some(Role::Knight));
    }

    #[test]
    fn test_parse_move_rejects_garbage() {
        assert!(parse_move("").is_none());
        assert!(parse_move("e2").is_none());
        assert!(parse_move("z9e4").is_none());
        assert!(parse_move("e2e4qq").is_none());
    }

    #[test]
    fn test_parse_move_rejects_non_ascii_without_panicking() {
        // Multi-byte characters land mid-codepoint at the byte offsets
        // above; they must be rejected, not crash the process.
        assert!(parse_move("aé4").is_none());
        assert!(parse_move("é2e4").is_none());
        assert!(parse_move("e2e4♛").is_none());
    }
}
