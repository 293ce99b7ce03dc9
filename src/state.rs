// src/state.rs
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{ChessError, InvalidMoveReason};
use crate::layout::Layout;
use crate::types::{Color, Move, MoveKind, Piece, PieceType, Position, BOARD_SIZE};

/// Column the king starts on.
pub const KING_HOME_COLUMN: i8 = 5;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastleSide { KingSide, QueenSide }

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    pub fn rook_column(&self) -> i8 {
        match self { CastleSide::KingSide => BOARD_SIZE, CastleSide::QueenSide => 1 }
    }

    /// Column step of the king toward this side's rook.
    pub fn direction(&self) -> i8 {
        match self { CastleSide::KingSide => 1, CastleSide::QueenSide => -1 }
    }

    pub fn rook_home(&self, color: Color) -> Position {
        Position::new(color.back_rank(), self.rook_column())
    }

    fn from_rook_square(pos: Position) -> Option<(Color, CastleSide)> {
        let color = match pos.row() {
            1 => Color::White,
            BOARD_SIZE => Color::Black,
            _ => return None,
        };
        CastleSide::BOTH.into_iter().find(|side| side.rook_column() == pos.column()).map(|side| (color, side))
    }
}

/// King's home square for a color.
pub fn king_home(color: Color) -> Position {
    Position::new(color.back_rank(), KING_HOME_COLUMN)
}

/// One bit per (color, side). Bits only ever go from true to false.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    rights: [[bool; 2]; 2],
}

impl CastlingRights {
    pub fn all() -> Self { CastlingRights { rights: [[true; 2]; 2] } }
    pub fn none() -> Self { CastlingRights { rights: [[false; 2]; 2] } }

    /// Rights implied by a layout: held where king and rook still stand on their home squares.
    pub fn from_board(board: &Board) -> Self {
        let mut rights = CastlingRights::none();
        for color in [Color::White, Color::Black] {
            if board.get(king_home(color)) != Some(Piece::new(color, PieceType::King)) { continue; }
            for side in CastleSide::BOTH {
                if board.get(side.rook_home(color)) == Some(Piece::new(color, PieceType::Rook)) {
                    rights.rights[color.index()][side as usize] = true;
                }
            }
        }
        rights
    }

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        self.rights[color.index()][side as usize]
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.rights[color.index()][side as usize] = false;
    }

    pub fn king_moved(&mut self, color: Color) {
        self.rights[color.index()] = [false; 2];
    }
}

/// Everything the rules need: side to move, board, castling rights and en-passant target.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    pub turn: Color,
    pub board: Board,
    pub castling: CastlingRights,
    /// Square skipped by a pawn's two-square advance on the previous ply.
    pub en_passant: Option<Position>,
}

impl GameState {
    /// Fresh state for a layout, White to move.
    pub fn from_layout<L: Layout + ?Sized>(layout: &L) -> Result<Self, ChessError> {
        Ok(GameState::from_board(Board::from_layout(layout)?, Color::White))
    }

    pub fn from_board(board: Board, turn: Color) -> Self {
        let castling = CastlingRights::from_board(&board);
        GameState { turn, board, castling, en_passant: None }
    }

    /// Moves pieces for `mv` without any legality checks (trial steps 2 and 3).
    pub(crate) fn apply_pieces(&mut self, mv: &Move) -> Result<(), ChessError> {
        let mover = self.board.place(mv.start, None)?
            .ok_or(ChessError::InvalidMove(InvalidMoveReason::NoPiece))?;
        let placed = match mv.promotion {
            Some(kind) => Piece::new(mover.color, kind),
            None => mover,
        };
        self.board.place(mv.end, Some(placed))?;

        match mv.kind {
            MoveKind::EnPassant => {
                self.board.place(Position::new(mv.start.row(), mv.end.column()), None)?;
            }
            MoveKind::Castle => {
                let side = if mv.end.column() > mv.start.column() { CastleSide::KingSide } else { CastleSide::QueenSide };
                let rook_from = side.rook_home(mover.color);
                let rook_to = Position::new(mv.end.row(), mv.end.column() - side.direction());
                let rook = self.board.place(rook_from, None)?;
                self.board.place(rook_to, rook)?;
            }
            MoveKind::Normal => {}
        }
        Ok(())
    }

    /// Status updates of a real commit: castling rights, en-passant target, turn.
    pub(crate) fn finish_commit(&mut self, mv: &Move, mover: Piece) {
        // The previous target's one-ply window closes with this move.
        self.en_passant = None;

        match mover.kind {
            PieceType::King => self.castling.king_moved(mover.color),
            PieceType::Rook => {
                if let Some((color, side)) = CastleSide::from_rook_square(mv.start) {
                    if color == mover.color { self.castling.revoke(color, side); }
                }
            }
            PieceType::Pawn if mv.vertical_length() == 2 => {
                self.en_passant = mv.start.add(mover.color.forward(), 0);
            }
            _ => {}
        }

        // Landing on an enemy corner removes (or already removed) that rook.
        if let Some((color, side)) = CastleSide::from_rook_square(mv.end) {
            if color != mover.color { self.castling.revoke(color, side); }
        }

        self.turn = self.turn.opponent();
    }
}
