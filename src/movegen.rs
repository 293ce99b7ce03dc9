// src/movegen.rs
//! Geometric move generation. Nothing here checks whether the mover's own king
//! is left in check; that is the engine's job.
use crate::state::{king_home, CastleSide, GameState};
use crate::types::{Color, Move, MoveKind, Piece, PieceType, Position};

// Longest straight run on an 8x8 board.
const MAX_SLIDE: i8 = 7;

const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-1, 2), (-1, -2), (1, 2), (1, -2),
    (-2, 1), (-2, -1), (2, 1), (2, -1),
];

/// Every geometric move of the piece standing on `from`. Empty square yields nothing.
pub fn candidate_moves(state: &GameState, from: Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    if let Some(piece) = state.board.get(from) {
        generate_moves_for_piece(state, piece, from, &mut moves);
    }
    moves
}

/// Dispatches on piece type.
pub fn generate_moves_for_piece(state: &GameState, piece: Piece, from: Position, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceType::Pawn => generate_pawn_moves(state, piece.color, from, moves),
        PieceType::Knight => {
            for (dr, dc) in KNIGHT_JUMPS { follow_line(state, piece.color, from, dr, dc, 1, moves); }
        }
        PieceType::Bishop => generate_sliding_moves(state, piece.color, from, &DIAGONALS, moves),
        PieceType::Rook => generate_sliding_moves(state, piece.color, from, &ORTHOGONALS, moves),
        PieceType::Queen => {
            generate_sliding_moves(state, piece.color, from, &ORTHOGONALS, moves);
            generate_sliding_moves(state, piece.color, from, &DIAGONALS, moves);
        }
        PieceType::King => generate_king_moves(state, piece.color, from, moves),
    }
}

/// Walks from `from` along (dr, dc) for at most `max_steps` squares. Stops before
/// leaving the board; on meeting a piece, includes it only if it is an enemy and stops.
pub fn follow_line(state: &GameState, color: Color, from: Position, dr: i8, dc: i8, max_steps: i8, moves: &mut Vec<Move>) {
    let mut current = from;
    for _ in 0..max_steps {
        let next = match current.add(dr, dc) {
            Some(pos) => pos,
            None => break, // Off board
        };
        match state.board.get(next) {
            Some(occupant) => {
                if occupant.color != color {
                    moves.push(Move::new(from, next, None)); // Capture
                }
                break;
            }
            None => moves.push(Move::new(from, next, None)),
        }
        current = next;
    }
}

fn generate_sliding_moves(state: &GameState, color: Color, from: Position, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in directions {
        follow_line(state, color, from, dr, dc, MAX_SLIDE, moves);
    }
}

/// Pawn pushes, double pushes, captures, en passant, with promotion expansion.
fn generate_pawn_moves(state: &GameState, color: Color, from: Position, moves: &mut Vec<Move>) {
    let forward = color.forward();

    // Diagonal captures and en passant
    for dc in [-1, 1] {
        let target = match from.add(forward, dc) {
            Some(pos) => pos,
            None => continue,
        };
        match state.board.get(target) {
            Some(occupant) if occupant.color != color => add_with_promotions(color, from, target, moves),
            Some(_) => {}
            None => {
                if is_en_passant_target(state, color, from, target) {
                    moves.push(Move::tagged(from, target, MoveKind::EnPassant));
                }
            }
        }
    }

    // Pushes
    let one = match from.add(forward, 0) {
        Some(pos) => pos,
        None => return,
    };
    if !state.board.is_empty(one) { return; }
    add_with_promotions(color, from, one, moves);

    if from.row() == color.pawn_rank() {
        if let Some(two) = one.add(forward, 0) {
            if state.board.is_empty(two) {
                moves.push(Move::new(from, two, None));
            }
        }
    }
}

/// Empty diagonal square matching the en-passant target, with an enemy pawn beside the mover.
fn is_en_passant_target(state: &GameState, color: Color, from: Position, target: Position) -> bool {
    if state.en_passant != Some(target) { return false; }
    let beside = Position::new(from.row(), target.column());
    state.board.get(beside) == Some(Piece::new(color.opponent(), PieceType::Pawn))
}

/// A move onto the far rank becomes one move per promotion type; anything else is added as-is.
fn add_with_promotions(color: Color, from: Position, to: Position, moves: &mut Vec<Move>) {
    if to.row() == color.promotion_rank() {
        for kind in PieceType::PROMOTIONS {
            moves.push(Move::new(from, to, Some(kind)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

/// One-step king moves plus castling candidates.
/// Whether the king is in or passes through check is decided by the engine.
fn generate_king_moves(state: &GameState, color: Color, from: Position, moves: &mut Vec<Move>) {
    for &(dr, dc) in ORTHOGONALS.iter().chain(DIAGONALS.iter()) {
        follow_line(state, color, from, dr, dc, 1, moves);
    }

    if from != king_home(color) { return; }
    for side in CastleSide::BOTH {
        if !state.castling.has(color, side) { continue; }
        let rook_pos = side.rook_home(color);
        if state.board.get(rook_pos) != Some(Piece::new(color, PieceType::Rook)) { continue; }

        let (lo, hi) = if rook_pos.column() > from.column() {
            (from.column(), rook_pos.column())
        } else {
            (rook_pos.column(), from.column())
        };
        let path_clear = (lo + 1..hi).all(|column| state.board.is_empty(Position::new(from.row(), column)));
        if !path_clear { continue; }

        if let Some(to) = from.add(0, 2 * side.direction()) {
            moves.push(Move::tagged(from, to, MoveKind::Castle));
        }
    }
}
