// src/types.rs
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

// --- Board Geometry ---
pub const BOARD_SIZE: i8 = 8;

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Row the color's king and rooks start on.
    pub fn back_rank(&self) -> i8 {
        match self { Color::White => 1, Color::Black => BOARD_SIZE }
    }

    /// Row the color's pawns may double-push from.
    pub fn pawn_rank(&self) -> i8 {
        match self { Color::White => 2, Color::Black => BOARD_SIZE - 1 }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_rank(&self) -> i8 {
        self.opponent().back_rank()
    }

    /// Row delta of a forward pawn step.
    pub fn forward(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    pub(crate) fn index(&self) -> usize {
        match self { Color::White => 0, Color::Black => 1 }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType { King, Queen, Bishop, Knight, Rook, Pawn }

impl PieceType {
    /// Types a pawn may promote to, queen first.
    pub const PROMOTIONS: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self { Piece { color, kind } }
}

/// A square on the board. Row 1 is White's back rank, column 1 is the a-file.
///
/// `new` does not validate; positions coming from `add` are always on the board.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: i8,
    column: i8,
}

impl Position {
    pub const fn new(row: i8, column: i8) -> Self { Position { row, column } }

    pub fn row(&self) -> i8 { self.row }
    pub fn column(&self) -> i8 { self.column }

    pub fn is_on_board(&self) -> bool {
        (1..=BOARD_SIZE).contains(&self.row) && (1..=BOARD_SIZE).contains(&self.column)
    }

    /// Translates by (d_row, d_col), returning `None` when the result leaves the board.
    pub fn add(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let next = Position::new(self.row.checked_add(d_row)?, self.column.checked_add(d_col)?);
        if next.is_on_board() { Some(next) } else { None }
    }

    /// Zero-based (row, column) grid indices, if on the board.
    pub(crate) fn indices(&self) -> Option<(usize, usize)> {
        if self.is_on_board() {
            Some(((self.row - 1) as usize, (self.column - 1) as usize))
        } else {
            None
        }
    }

    /// Every square, row by row starting at row 1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |column| Position::new(row, column)))
    }
}

// --- Move Representation ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum MoveKind {
    #[default]
    Normal,
    EnPassant,
    Castle,
}

/// A move from `start` to `end`. The `kind` tag is set by the generator and does
/// not take part in equality, so a boundary move built with `Move::new` matches
/// its generated counterpart.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
    #[serde(default)]
    pub kind: MoveKind,
}

impl Move {
    pub fn new(start: Position, end: Position, promotion: Option<PieceType>) -> Self {
        Move { start, end, promotion, kind: MoveKind::Normal }
    }

    pub(crate) fn tagged(start: Position, end: Position, kind: MoveKind) -> Self {
        Move { start, end, promotion: None, kind }
    }

    pub fn vertical_length(&self) -> i8 {
        (self.end.row() - self.start.row()).abs()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.promotion.hash(state);
    }
}
