// tests/common/mod.rs
#![allow(dead_code)]
use chess_rules::{GameEngine, Move, Piece, PieceType, Position};

/// "e4" -> Position.
pub fn sq(name: &str) -> Position {
    let bytes = name.as_bytes();
    Position::new((bytes[1] - b'0') as i8, (bytes[0] - b'a' + 1) as i8)
}

/// "e2e4" or "e7e8q" -> Move.
pub fn mv(text: &str) -> Move {
    let promotion = text.as_bytes().get(4).map(|c| match c {
        b'q' => PieceType::Queen,
        b'r' => PieceType::Rook,
        b'b' => PieceType::Bishop,
        _ => PieceType::Knight,
    });
    Move::new(sq(&text[0..2]), sq(&text[2..4]), promotion)
}

/// Plays a sequence of coordinate moves, panicking on the first illegal one.
pub fn play(engine: &mut GameEngine, moves: &[&str]) {
    for text in moves {
        engine.make_move(mv(text)).unwrap_or_else(|e| panic!("{} rejected: {}", text, e));
    }
}

pub fn engine_from(pieces: &[(&str, Piece)]) -> GameEngine {
    let placed: Vec<(Position, Piece)> = pieces.iter().map(|(name, piece)| (sq(name), *piece)).collect();
    GameEngine::with_layout(placed.as_slice()).expect("layout fits the board")
}

pub fn ends(moves: &[Move]) -> Vec<Position> {
    let mut out: Vec<Position> = moves.iter().map(|m| m.end).collect();
    out.sort();
    out.dedup();
    out
}
