// src/error.rs
use std::error::Error;
use std::fmt;

use crate::types::Position;

/// Why a move was refused. Diagnostic only: callers re-derive `valid_moves`
/// to find legal alternatives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidMoveReason {
    NoPiece,
    WrongTurn,
    Unreachable,
    LeavesKingInCheck,
    CastleThroughCheck,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChessError {
    InvalidMove(InvalidMoveReason),
    OutOfBounds(Position),
}

impl fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMoveReason::NoPiece => write!(f, "no piece on the start square"),
            InvalidMoveReason::WrongTurn => write!(f, "it is not that piece's turn to move"),
            InvalidMoveReason::Unreachable => write!(f, "the piece cannot reach that square"),
            InvalidMoveReason::LeavesKingInCheck => write!(f, "the move leaves the king in check"),
            InvalidMoveReason::CastleThroughCheck => write!(f, "the king cannot castle out of or through check"),
        }
    }
}

impl fmt::Display for ChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessError::InvalidMove(reason) => write!(f, "Invalid move: {}", reason),
            ChessError::OutOfBounds(pos) => write!(f, "Position ({}, {}) is off the board", pos.row(), pos.column()),
        }
    }
}

impl Error for ChessError {}
