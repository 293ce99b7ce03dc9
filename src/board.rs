// src/board.rs
use serde::{Deserialize, Serialize};

use crate::error::ChessError;
use crate::layout::{Layout, StandardLayout};
use crate::types::{Color, Piece, PieceType, Position, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// 8x8 grid of optional pieces, indexed `[row - 1][column - 1]`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Piece>; SIZE]; SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [[None; SIZE]; SIZE] }
    }

    /// The standard 32-piece starting arrangement.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (pos, piece) in StandardLayout.pieces() {
            if let Some((row, col)) = pos.indices() {
                board.cells[row][col] = Some(piece);
            }
        }
        board
    }

    /// Builds a board from an external layout supplier.
    pub fn from_layout<L: Layout + ?Sized>(layout: &L) -> Result<Self, ChessError> {
        let mut board = Board::empty();
        for (pos, piece) in layout.pieces() {
            board.place(pos, Some(piece))?;
        }
        Ok(board)
    }

    /// Overwrites a cell, returning its previous occupant. Placing `None` removes a piece.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) -> Result<Option<Piece>, ChessError> {
        let (row, col) = pos.indices().ok_or(ChessError::OutOfBounds(pos))?;
        Ok(std::mem::replace(&mut self.cells[row][col], piece))
    }

    /// Occupant of `pos`; off-board positions read as empty.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        pos.indices().and_then(|(row, col)| self.cells[row][col])
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// First square (row-major from row 1) holding a piece of this color and type.
    pub fn locate(&self, color: Color, kind: PieceType) -> Option<Position> {
        self.pieces().find(|(_, p)| p.color == color && p.kind == kind).map(|(pos, _)| pos)
    }

    pub fn king(&self, color: Color) -> Option<Position> {
        self.locate(color, PieceType::King)
    }

    /// Every occupied cell.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }
}
