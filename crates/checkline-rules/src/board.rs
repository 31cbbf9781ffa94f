//! The mutable position handle used by the session orchestrator.

use rand::Rng;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role, Square};

use crate::RulesError;

/// A move that has been applied to the board.
///
/// `from`/`to` are the squares a presentation layer would highlight —
/// for castling that is the king's origin and destination, not the
/// engine-internal king-takes-rook encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// The move in standard algebraic notation, including check/mate suffix.
    pub san: String,
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// The color that made the move.
    pub color: Color,
}

/// The authoritative game position plus its SAN move history.
///
/// All mutation goes through [`apply`](Board::apply),
/// [`apply_san`](Board::apply_san), or
/// [`apply_random`](Board::apply_random); the history stays in sync
/// with the position by construction.
#[derive(Debug, Clone)]
pub struct Board {
    pos: Chess,
    history: Vec<String>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board at the standard starting position.
    pub fn new() -> Self {
        Self {
            pos: Chess::default(),
            history: Vec::new(),
        }
    }

    /// Creates a board from a FEN string with an empty history.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        let pos = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        Ok(Self {
            pos,
            history: Vec::new(),
        })
    }

    /// Resets to the starting position and clears the move history.
    pub fn reset(&mut self) {
        self.pos = Chess::default();
        self.history.clear();
    }

    /// The color whose turn it is to move.
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// The current position as a FEN string.
    pub fn fen(&self) -> String {
        Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string()
    }

    /// The SAN history of every applied move, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    /// Draw by stalemate, insufficient material, or the fifty-move rule.
    ///
    /// Threefold repetition is not tracked: the position handle is
    /// stateless across moves, matching the adapter contract.
    pub fn is_draw(&self) -> bool {
        self.pos.is_stalemate()
            || self.pos.is_insufficient_material()
            || self.pos.halfmoves() >= 100
    }

    /// True when no further moves are possible (checkmate or draw).
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// Destination squares of every legal move from `from`.
    ///
    /// Castling is reported as the king's destination (g1/c1 style).
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let turn = self.pos.turn();
        self.pos
            .legal_moves()
            .into_iter()
            .filter_map(|m| match m {
                Move::Castle { king, .. } => {
                    let side = m.castling_side()?;
                    (king == from).then(|| side.king_to(turn))
                }
                _ => (m.from() == Some(from)).then(|| m.to()),
            })
            .collect()
    }

    /// Applies a move given by coordinates.
    ///
    /// `promotion` defaults to queen when the move is a promotion and no
    /// piece was specified. Castling accepts either the king destination
    /// (e1→g1) or the rook square as `to`.
    pub fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<AppliedMove, RulesError> {
        if self.is_game_over() {
            return Err(RulesError::GameOver);
        }
        let want = promotion.unwrap_or(Role::Queen);
        let turn = self.pos.turn();
        let candidate = self
            .pos
            .legal_moves()
            .into_iter()
            .find(|m| match m {
                Move::Castle { king, .. } => match m.castling_side() {
                    Some(side) => {
                        *king == from && (side.king_to(turn) == to || m.to() == to)
                    }
                    None => false,
                },
                _ => {
                    m.from() == Some(from)
                        && m.to() == to
                        && m.promotion().is_none_or(|r| r == want)
                }
            })
            .ok_or_else(|| RulesError::IllegalMove(format!("{from}{to}")))?;
        self.apply_engine_move(candidate)
    }

    /// Applies a move given in standard algebraic notation.
    ///
    /// Check/mate suffixes are accepted and ignored during matching.
    pub fn apply_san(&mut self, san: &str) -> Result<AppliedMove, RulesError> {
        if self.is_game_over() {
            return Err(RulesError::GameOver);
        }
        let parsed: SanPlus = san
            .parse()
            .map_err(|_| RulesError::InvalidSan(san.to_string()))?;
        let m = parsed
            .san
            .to_move(&self.pos)
            .map_err(|_| RulesError::IllegalMove(san.to_string()))?;
        self.apply_engine_move(m)
    }

    /// Applies a uniformly random legal move.
    ///
    /// Returns `None` when there are no legal moves (game over).
    pub fn apply_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<AppliedMove> {
        let moves = self.pos.legal_moves();
        if moves.is_empty() || self.is_game_over() {
            return None;
        }
        let m = moves[rng.random_range(0..moves.len())].clone();
        self.apply_engine_move(m).ok()
    }

    fn apply_engine_move(&mut self, m: Move) -> Result<AppliedMove, RulesError> {
        let color = self.pos.turn();
        let san = SanPlus::from_move(self.pos.clone(), &m).to_string();
        let (from, to) = display_squares(&m, color);
        self.pos = self
            .pos
            .clone()
            .play(&m)
            .map_err(|_| RulesError::IllegalMove(san.clone()))?;
        self.history.push(san.clone());
        tracing::debug!(%san, "move applied");
        Ok(AppliedMove {
            san,
            from,
            to,
            color,
        })
    }
}

/// Maps an engine move to the squares a UI would highlight.
fn display_squares(m: &Move, turn: Color) -> (Square, Square) {
    match m {
        Move::Castle { king, .. } => match m.castling_side() {
            Some(side) => (*king, side.king_to(turn)),
            None => (*king, m.to()),
        },
        _ => (m.from().unwrap_or_else(|| m.to()), m.to()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_new_board_is_starting_position() {
        let board = Board::new();
        assert_eq!(board.fen(), START_FEN);
        assert_eq!(board.turn(), Color::White);
        assert!(board.history().is_empty());
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_legal_targets_for_pawn() {
        let board = Board::new();
        let mut targets = board.legal_targets(Square::E2);
        targets.sort();
        assert_eq!(targets, vec![Square::E3, Square::E4]);
    }

    #[test]
    fn test_legal_targets_empty_square_has_none() {
        let board = Board::new();
        assert!(board.legal_targets(Square::E4).is_empty());
    }

    #[test]
    fn test_apply_records_san_history() {
        let mut board = Board::new();
        board.apply(Square::E2, Square::E4, None).unwrap();
        board.apply(Square::E7, Square::E5, None).unwrap();
        assert_eq!(board.history(), &["e4".to_string(), "e5".to_string()]);
    }

    #[test]
    fn test_apply_alternates_turn() {
        let mut board = Board::new();
        assert_eq!(board.turn(), Color::White);
        board.apply(Square::E2, Square::E4, None).unwrap();
        assert_eq!(board.turn(), Color::Black);
        board.apply(Square::E7, Square::E5, None).unwrap();
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn test_apply_illegal_move_is_rejected() {
        let mut board = Board::new();
        let result = board.apply(Square::E2, Square::E5, None);
        assert!(matches!(result, Err(RulesError::IllegalMove(_))));
        // Position and history untouched.
        assert_eq!(board.fen(), START_FEN);
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_apply_san_accepts_check_suffix() {
        let mut board = Board::new();
        board.apply_san("e4").unwrap();
        board.apply_san("e5").unwrap();
        board.apply_san("Qh5").unwrap();
        board.apply_san("Nc6").unwrap();
        // The raw AI reply often carries the suffix already.
        let applied = board.apply_san("Bc4").unwrap();
        assert_eq!(applied.color, Color::White);
    }

    #[test]
    fn test_apply_san_rejects_garbage() {
        let mut board = Board::new();
        assert!(matches!(
            board.apply_san("zz9"),
            Err(RulesError::InvalidSan(_))
        ));
        assert!(matches!(
            board.apply_san("Qh5"),
            Err(RulesError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_scholars_mate_is_checkmate() {
        let mut board = Board::new();
        for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"] {
            board.apply_san(san).unwrap();
        }
        let mate = board.apply_san("Qxf7#").unwrap();
        assert_eq!(mate.san, "Qxf7#");
        assert!(board.is_checkmate());
        assert!(board.is_game_over());
        // Black is on turn and mated; White is the winner.
        assert_eq!(board.turn(), Color::Black);
        assert!(matches!(
            board.apply(Square::G8, Square::F6, None),
            Err(RulesError::GameOver)
        ));
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut board = Board::new();
        for san in ["a4", "b5", "axb5", "a6", "bxa6", "Bb7", "axb7", "d5"] {
            board.apply_san(san).unwrap();
        }
        let applied = board.apply(Square::B7, Square::A8, None).unwrap();
        assert_eq!(applied.san, "bxa8=Q");
    }

    #[test]
    fn test_explicit_underpromotion() {
        let mut board = Board::new();
        for san in ["a4", "b5", "axb5", "a6", "bxa6", "Bb7", "axb7", "d5"] {
            board.apply_san(san).unwrap();
        }
        let applied = board
            .apply(Square::B7, Square::A8, Some(Role::Knight))
            .unwrap();
        assert_eq!(applied.san, "bxa8=N");
    }

    #[test]
    fn test_castling_by_king_destination() {
        let mut board = Board::new();
        for san in ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"] {
            board.apply_san(san).unwrap();
        }
        let applied = board.apply(Square::E1, Square::G1, None).unwrap();
        assert_eq!(applied.san, "O-O");
        assert_eq!(applied.from, Square::E1);
        assert_eq!(applied.to, Square::G1);
    }

    #[test]
    fn test_stalemate_is_draw_not_checkmate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(board.is_draw());
        assert!(!board.is_checkmate());
        assert!(board.is_game_over());
    }

    #[test]
    fn test_apply_random_picks_a_legal_move() {
        let mut board = Board::new();
        board.apply(Square::E2, Square::E4, None).unwrap();
        let mut rng = rand::rng();
        let applied = board.apply_random(&mut rng).expect("black has moves");
        assert_eq!(applied.color, Color::Black);
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn test_apply_random_returns_none_when_over() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut rng = rand::rng();
        assert!(board.apply_random(&mut rng).is_none());
    }

    #[test]
    fn test_reset_clears_history_and_position() {
        let mut board = Board::new();
        board.apply(Square::E2, Square::E4, None).unwrap();
        board.reset();
        assert_eq!(board.fen(), START_FEN);
        assert!(board.history().is_empty());
        assert_eq!(board.turn(), Color::White);
    }
}
