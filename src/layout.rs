// src/layout.rs
use crate::types::{Color, Piece, PieceType, Position, BOARD_SIZE};

/// Supplies a starting arrangement. Consumed once at construction or reset.
pub trait Layout {
    fn pieces(&self) -> Vec<(Position, Piece)>;
}

/// The standard 32-piece arrangement.
#[derive(Debug, Copy, Clone, Default)]
pub struct StandardLayout;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
    PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
];

impl Layout for StandardLayout {
    fn pieces(&self) -> Vec<(Position, Piece)> {
        let mut out = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            for column in 1..=BOARD_SIZE {
                let kind = BACK_RANK[(column - 1) as usize];
                out.push((Position::new(color.back_rank(), column), Piece::new(color, kind)));
                out.push((Position::new(color.pawn_rank(), column), Piece::new(color, PieceType::Pawn)));
            }
        }
        out
    }
}

/// Explicit list of placements, handy for puzzles and tests.
impl Layout for [(Position, Piece)] {
    fn pieces(&self) -> Vec<(Position, Piece)> {
        self.to_vec()
    }
}

impl<const N: usize> Layout for [(Position, Piece); N] {
    fn pieces(&self) -> Vec<(Position, Piece)> {
        self.to_vec()
    }
}
