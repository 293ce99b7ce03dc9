// src/lib.rs
//! Chess rules: board model, move generation, legality filtering, check, checkmate
//! and stalemate detection, and move commits including castling, en passant and promotion.

pub mod board;
pub mod engine;
pub mod error;
pub mod layout;
pub mod movegen;
pub mod state;
pub mod types;

pub use board::Board;
pub use engine::{GameEngine, GameStatus};
pub use error::{ChessError, InvalidMoveReason};
pub use layout::{Layout, StandardLayout};
pub use state::{CastleSide, CastlingRights, GameState};
pub use types::{Color, Move, MoveKind, Piece, PieceType, Position};
