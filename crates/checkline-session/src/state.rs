//! Play modes, peer link state, and the derived game status.

use std::fmt;

use checkline_rules::Color;

/// Which seat the local player holds in a multiplayer game.
///
/// The side that opened the room plays White; the side that joined
/// plays Black. Fixed at link time, never negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Host,
    Guest,
}

impl PeerRole {
    /// The color this seat plays.
    pub fn color(self) -> Color {
        match self {
            Self::Host => Color::White,
            Self::Guest => Color::Black,
        }
    }
}

/// The play mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Local player as White against the engine as Black.
    #[default]
    Bot,
    /// Two humans over a peer link.
    Multiplayer { role: PeerRole },
}

impl Mode {
    /// The color the local player moves.
    pub fn local_color(self) -> Color {
        match self {
            Self::Bot => Color::White,
            Self::Multiplayer { role } => role.color(),
        }
    }
}

/// The lifecycle of the peer link.
///
/// `Searching` covers both sides of establishment: a host whose room
/// is open and waiting for a guest, and a guest mid-connect. Moves are
/// only accepted over a `Connected` link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Offline,
    Searching,
    Connected,
}

/// The game status a presentation layer would show.
///
/// Resignation outcomes override whatever the board itself would say;
/// board-derived states follow in precedence order checkmate, draw,
/// check, playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    Check,
    Checkmate { winner: Color },
    Draw,
    LocalResigned,
    OpponentResigned,
}

impl SessionStatus {
    /// True when no further moves are accepted in this status.
    pub fn is_over(self) -> bool {
        !matches!(self, Self::Playing | Self::Check)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "in progress"),
            Self::Check => write!(f, "check"),
            Self::Checkmate { winner } => {
                let winner = match winner {
                    Color::White => "White",
                    Color::Black => "Black",
                };
                write!(f, "checkmate, {winner} wins")
            }
            Self::Draw => write!(f, "draw"),
            Self::LocalResigned => write!(f, "you resigned, opponent wins"),
            Self::OpponentResigned => write!(f, "opponent resigned, you win"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_plays_white_guest_plays_black() {
        assert_eq!(PeerRole::Host.color(), Color::White);
        assert_eq!(PeerRole::Guest.color(), Color::Black);
    }

    #[test]
    fn test_local_color_per_mode() {
        assert_eq!(Mode::Bot.local_color(), Color::White);
        assert_eq!(
            Mode::Multiplayer {
                role: PeerRole::Guest
            }
            .local_color(),
            Color::Black
        );
    }

    #[test]
    fn test_status_is_over() {
        assert!(!SessionStatus::Playing.is_over());
        assert!(!SessionStatus::Check.is_over());
        assert!(SessionStatus::Draw.is_over());
        assert!(SessionStatus::LocalResigned.is_over());
        assert!(SessionStatus::OpponentResigned.is_over());
        assert!(SessionStatus::Checkmate {
            winner: Color::White
        }
        .is_over());
    }
}
