// src/engine.rs
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{ChessError, InvalidMoveReason};
use crate::layout::Layout;
use crate::movegen::candidate_moves;
use crate::state::GameState;
use crate::types::{Color, Move, MoveKind, Position};

/// Outcome of the position for the side to move.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check(Color),
    Checkmate(Color),
    Stalemate(Color),
}

// --- Rules over an explicit state ---

/// True iff any opposing piece can geometrically reach `color`'s king.
/// Rescans the whole board on every call so discovered attacks are always seen.
pub fn is_in_check(state: &GameState, color: Color) -> bool {
    let king_pos = match state.board.king(color) {
        Some(pos) => pos,
        None => return false, // No king to attack
    };
    state.board.pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(pos, _)| candidate_moves(state, pos).iter().any(|mv| mv.end == king_pos))
}

/// Applies `mv` to a copy of `state` and checks the mover's king (trial steps 1 to 4).
/// `mv` must be a generated move so its kind tag is trusted.
fn apply_checked(state: &GameState, mv: &Move) -> Result<GameState, ChessError> {
    let mover = state.board.get(mv.start).ok_or(ChessError::InvalidMove(InvalidMoveReason::NoPiece))?;

    if mv.kind == MoveKind::Castle {
        // Cannot castle out of check, nor through the square the king passes over.
        if is_in_check(state, mover.color) {
            return Err(ChessError::InvalidMove(InvalidMoveReason::CastleThroughCheck));
        }
        let step = if mv.end.column() > mv.start.column() { 1 } else { -1 };
        let pass = Position::new(mv.start.row(), mv.start.column() + step);
        if !is_legal_in(state, &Move::new(mv.start, pass, None)) {
            return Err(ChessError::InvalidMove(InvalidMoveReason::CastleThroughCheck));
        }
    }

    let mut next = state.clone();
    next.apply_pieces(mv)?;
    if is_in_check(&next, mover.color) {
        // The copy is dropped here; `state` was never touched.
        return Err(ChessError::InvalidMove(InvalidMoveReason::LeavesKingInCheck));
    }
    Ok(next)
}

/// Matches a boundary move against the generated set, recovering its kind tag.
fn find_candidate(state: &GameState, mv: &Move) -> Result<Move, ChessError> {
    candidate_moves(state, mv.start)
        .into_iter()
        .find(|candidate| candidate == mv)
        .ok_or(ChessError::InvalidMove(InvalidMoveReason::Unreachable))
}

/// Legality probe: the only place an `InvalidMove` is swallowed. Ignores whose turn it is.
pub fn is_legal_in(state: &GameState, mv: &Move) -> bool {
    find_candidate(state, mv).and_then(|candidate| apply_checked(state, &candidate)).is_ok()
}

/// Legal moves of the piece on `pos`, whichever color it is. Empty square gives an empty list.
pub fn valid_moves_in(state: &GameState, pos: Position) -> Vec<Move> {
    candidate_moves(state, pos)
        .into_iter()
        .filter(|mv| apply_checked(state, mv).is_ok())
        .collect()
}

/// Commits `mv` for the side to move, returning the successor state.
pub fn play(state: &GameState, mv: &Move) -> Result<GameState, ChessError> {
    let mover = state.board.get(mv.start).ok_or(ChessError::InvalidMove(InvalidMoveReason::NoPiece))?;
    if mover.color != state.turn {
        return Err(ChessError::InvalidMove(InvalidMoveReason::WrongTurn));
    }
    let candidate = find_candidate(state, mv)?;
    let mut next = apply_checked(state, &candidate)?;
    next.finish_commit(&candidate, mover);
    Ok(next)
}

fn has_any_legal_move(state: &GameState, color: Color) -> bool {
    state.board.pieces()
        .filter(|(_, piece)| piece.color == color)
        .any(|(pos, _)| !valid_moves_in(state, pos).is_empty())
}

fn king_has_legal_move(state: &GameState, color: Color) -> bool {
    state.board.king(color).is_some_and(|pos| !valid_moves_in(state, pos).is_empty())
}

/// King has no legal move and neither does any other piece of `color`.
fn is_out_of_moves(state: &GameState, color: Color) -> bool {
    !king_has_legal_move(state, color) && !has_any_legal_move(state, color)
}

pub fn is_in_checkmate(state: &GameState, color: Color) -> bool {
    is_in_check(state, color) && is_out_of_moves(state, color)
}

pub fn is_in_stalemate(state: &GameState, color: Color) -> bool {
    !is_in_check(state, color) && is_out_of_moves(state, color)
}

pub fn status_of(state: &GameState) -> GameStatus {
    let color = state.turn;
    let check = is_in_check(state, color);
    match (check, is_out_of_moves(state, color)) {
        (true, true) => GameStatus::Checkmate(color),
        (false, true) => GameStatus::Stalemate(color),
        (true, false) => GameStatus::Check(color),
        (false, false) => GameStatus::Ongoing,
    }
}

// --- Engine ---

/// Owns one game's state and is the only thing that commits moves to it.
/// Not meant for concurrent use; hosts running many games keep one engine per game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameEngine {
    state: GameState,
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

impl GameEngine {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        GameEngine { state: GameState::from_board(Board::standard(), Color::White) }
    }

    pub fn with_layout<L: Layout + ?Sized>(layout: &L) -> Result<Self, ChessError> {
        Ok(GameEngine { state: GameState::from_layout(layout)? })
    }

    pub fn from_state(state: GameState) -> Self {
        GameEngine { state }
    }

    /// Back to the standard starting position.
    pub fn reset(&mut self) {
        *self = GameEngine::new();
    }

    pub fn state(&self) -> &GameState { &self.state }
    pub fn board(&self) -> &Board { &self.state.board }
    pub fn turn(&self) -> Color { self.state.turn }

    pub fn set_turn(&mut self, color: Color) {
        self.state.turn = color;
    }

    /// Replaces the board. Castling rights are re-derived from it and any en-passant window is closed.
    pub fn set_board(&mut self, board: Board) {
        self.state = GameState::from_board(board, self.state.turn);
    }

    pub fn valid_moves(&self, pos: Position) -> Vec<Move> {
        valid_moves_in(&self.state, pos)
    }

    /// Every legal move of `color`, ignoring whose turn it is.
    pub fn all_valid_moves(&self, color: Color) -> Vec<Move> {
        self.state.board.pieces()
            .filter(|(_, piece)| piece.color == color)
            .flat_map(|(pos, _)| self.valid_moves(pos))
            .collect()
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        is_legal_in(&self.state, mv)
    }

    /// Commits a move for the side to move. On error the state is left exactly as it was.
    pub fn make_move(&mut self, mv: Move) -> Result<(), ChessError> {
        self.state = play(&self.state, &mv)?;
        Ok(())
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.state, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        is_in_checkmate(&self.state, color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        is_in_stalemate(&self.state, color)
    }

    pub fn status(&self) -> GameStatus {
        status_of(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceType};

    fn sq(row: i8, column: i8) -> Position { Position::new(row, column) }

    fn mv(from: (i8, i8), to: (i8, i8)) -> Move {
        Move::new(sq(from.0, from.1), sq(to.0, to.1), None)
    }

    fn engine_with(pieces: &[(Position, Piece)], turn: Color) -> GameEngine {
        let mut engine = GameEngine::with_layout(pieces).unwrap();
        engine.set_turn(turn);
        engine
    }

    #[test]
    fn white_has_twenty_opening_moves() {
        let engine = GameEngine::new();
        assert_eq!(engine.all_valid_moves(Color::White).len(), 20);
        assert_eq!(engine.all_valid_moves(Color::Black).len(), 20);
        assert_eq!(engine.status(), GameStatus::Ongoing);
    }

    #[test]
    fn empty_square_yields_no_valid_moves() {
        assert!(GameEngine::new().valid_moves(sq(5, 5)).is_empty());
    }

    #[test]
    fn wrong_turn_and_missing_piece_are_rejected() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.make_move(mv((7, 5), (5, 5))), Err(ChessError::InvalidMove(InvalidMoveReason::WrongTurn)));
        assert_eq!(engine.make_move(mv((4, 4), (5, 4))), Err(ChessError::InvalidMove(InvalidMoveReason::NoPiece)));
        assert_eq!(engine.make_move(mv((2, 5), (5, 5))), Err(ChessError::InvalidMove(InvalidMoveReason::Unreachable)));
        assert_eq!(engine, GameEngine::new());
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let engine = engine_with(&[
            (sq(1, 5), Piece::new(Color::White, PieceType::King)),
            (sq(2, 5), Piece::new(Color::White, PieceType::Bishop)),
            (sq(8, 5), Piece::new(Color::Black, PieceType::Rook)),
            (sq(8, 1), Piece::new(Color::Black, PieceType::King)),
        ], Color::White);
        assert!(engine.valid_moves(sq(2, 5)).is_empty());
        assert!(!engine.is_legal(&mv((2, 5), (3, 4))));
    }

    #[test]
    fn king_may_not_step_into_attack() {
        let engine = engine_with(&[
            (sq(1, 5), Piece::new(Color::White, PieceType::King)),
            (sq(8, 4), Piece::new(Color::Black, PieceType::Rook)),
            (sq(8, 8), Piece::new(Color::Black, PieceType::King)),
        ], Color::White);
        let ends: Vec<Position> = engine.valid_moves(sq(1, 5)).iter().map(|m| m.end).collect();
        assert!(!ends.contains(&sq(1, 4)));
        assert!(!ends.contains(&sq(2, 4)));
        assert!(ends.contains(&sq(2, 6)));
    }

    #[test]
    fn failed_move_leaves_state_untouched() {
        let mut engine = engine_with(&[
            (sq(1, 5), Piece::new(Color::White, PieceType::King)),
            (sq(2, 5), Piece::new(Color::White, PieceType::Knight)),
            (sq(8, 5), Piece::new(Color::Black, PieceType::Queen)),
            (sq(8, 1), Piece::new(Color::Black, PieceType::King)),
        ], Color::White);
        let before = engine.state().clone();
        let err = engine.make_move(mv((2, 5), (4, 6))).unwrap_err();
        assert_eq!(err, ChessError::InvalidMove(InvalidMoveReason::LeavesKingInCheck));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn back_rank_mate_and_stalemate_are_exclusive() {
        let mate = engine_with(&[
            (sq(8, 7), Piece::new(Color::Black, PieceType::King)),
            (sq(7, 6), Piece::new(Color::Black, PieceType::Pawn)),
            (sq(7, 7), Piece::new(Color::Black, PieceType::Pawn)),
            (sq(7, 8), Piece::new(Color::Black, PieceType::Pawn)),
            (sq(8, 1), Piece::new(Color::White, PieceType::Rook)),
            (sq(1, 7), Piece::new(Color::White, PieceType::King)),
        ], Color::Black);
        assert!(mate.is_in_checkmate(Color::Black));
        assert!(!mate.is_in_stalemate(Color::Black));
        assert_eq!(mate.status(), GameStatus::Checkmate(Color::Black));

        // King in the corner, queen covering every flight square without giving check.
        let stale = engine_with(&[
            (sq(8, 8), Piece::new(Color::Black, PieceType::King)),
            (sq(6, 7), Piece::new(Color::White, PieceType::Queen)),
            (sq(1, 1), Piece::new(Color::White, PieceType::King)),
        ], Color::Black);
        assert!(stale.is_in_stalemate(Color::Black));
        assert!(!stale.is_in_checkmate(Color::Black));
        assert_eq!(stale.status(), GameStatus::Stalemate(Color::Black));
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut engine = engine_with(&[
            (sq(7, 1), Piece::new(Color::White, PieceType::Pawn)),
            (sq(1, 5), Piece::new(Color::White, PieceType::King)),
            (sq(5, 8), Piece::new(Color::Black, PieceType::King)),
        ], Color::White);
        assert_eq!(engine.valid_moves(sq(7, 1)).len(), 4);
        assert!(engine.make_move(mv((7, 1), (8, 1))).is_err());
        engine.make_move(Move::new(sq(7, 1), sq(8, 1), Some(PieceType::Knight))).unwrap();
        assert_eq!(engine.board().get(sq(8, 1)), Some(Piece::new(Color::White, PieceType::Knight)));
        assert_eq!(engine.turn(), Color::Black);
    }

    #[test]
    fn set_board_rederives_castling_rights() {
        let mut engine = GameEngine::new();
        engine.set_board(Board::empty());
        assert!(engine.all_valid_moves(Color::White).is_empty());
        assert!(!engine.is_in_check(Color::White));
        engine.reset();
        assert_eq!(engine, GameEngine::new());
    }
}
