// src/main.rs
//! Console front end for the rules engine: coordinate notation in, ASCII board out.
use chess_rules::{ChessError, Color, GameEngine, GameState, GameStatus, Move, Piece, PieceType, Position};
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};

// --- Constants ---
const DEFAULT_SAVE_FILENAME: &str = "chess_game.json";

lazy_static! {
    static ref MOVE_PATTERN: Regex = Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbn])?$").unwrap();
    static ref SQUARE_PATTERN: Regex = Regex::new(r"^([a-h])([1-8])$").unwrap();
}

// --- Notation Helpers ---

/// "e4" style name of a square. Off-board positions print as raw coordinates.
fn position_to_algebraic(pos: Position) -> String {
    if !pos.is_on_board() {
        return format!("({}, {})", pos.row(), pos.column());
    }
    let file_char = (b'a' + (pos.column() - 1) as u8) as char;
    format!("{}{}", file_char, pos.row())
}

fn algebraic_to_position(s: &str) -> Option<Position> {
    let caps = SQUARE_PATTERN.captures(s)?;
    let file = caps[1].as_bytes()[0] - b'a' + 1;
    let rank = caps[2].as_bytes()[0] - b'0';
    Some(Position::new(rank as i8, file as i8))
}

fn piece_symbol(piece: Piece) -> char {
    let symbol = match piece.kind {
        PieceType::Pawn => 'p', PieceType::Knight => 'n', PieceType::Bishop => 'b',
        PieceType::Rook => 'r', PieceType::Queen => 'q', PieceType::King => 'k',
    };
    match piece.color {
        Color::White => symbol.to_ascii_uppercase(),
        Color::Black => symbol,
    }
}

fn move_to_algebraic(mv: &Move) -> String {
    let promo = match mv.promotion {
        Some(PieceType::Queen) => "q", Some(PieceType::Rook) => "r",
        Some(PieceType::Bishop) => "b", Some(PieceType::Knight) => "n",
        _ => "",
    };
    format!("{}{}{}", position_to_algebraic(mv.start), position_to_algebraic(mv.end), promo)
}

/// Parses "e2e4" or "e7e8q". Format only; legality is the engine's call.
fn parse_move_algebraic(input: &str) -> Result<Move, CommandError> {
    let lower = input.trim().to_lowercase();
    let caps = MOVE_PATTERN.captures(&lower)
        .ok_or_else(|| CommandError::InvalidFormat(input.trim().to_string()))?;
    let start = algebraic_to_position(&caps[1]).ok_or_else(|| CommandError::InvalidFormat(caps[1].to_string()))?;
    let end = algebraic_to_position(&caps[2]).ok_or_else(|| CommandError::InvalidFormat(caps[2].to_string()))?;
    let promotion = caps.get(3).map(|m| match m.as_str() {
        "q" => PieceType::Queen, "r" => PieceType::Rook,
        "b" => PieceType::Bishop, _ => PieceType::Knight,
    });
    Ok(Move::new(start, end, promotion))
}

/// Board with rank 8 on top, the way a player sitting as White sees it.
fn render_board(engine: &GameEngine) -> String {
    let mut out = String::new();
    out.push_str("  +-----------------+\n");
    for row in (1..=8).rev() {
        out.push_str(&format!("{} | ", row));
        for column in 1..=8 {
            match engine.board().get(Position::new(row, column)) {
                Some(piece) => out.push_str(&format!("{} ", piece_symbol(piece))),
                None => out.push_str(". "),
            }
        }
        out.push_str("|\n");
    }
    out.push_str("  +-----------------+\n");
    out.push_str("    a b c d e f g h\n");
    out.push_str(&format!("Turn: {:?}\n", engine.turn()));
    if let Some(ep) = engine.state().en_passant {
        out.push_str(&format!("En Passant Target: {}\n", position_to_algebraic(ep)));
    }
    out
}

// --- Error Types ---

#[derive(Debug)]
pub enum SaveLoadError {
    Serialization(serde_json::Error),
    Io(String, io::Error),
    InvalidState(String),
}
impl fmt::Display for SaveLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveLoadError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SaveLoadError::Io(file, e) => write!(f, "I/O error with file '{}': {}", file, e),
            SaveLoadError::InvalidState(reason) => write!(f, "Saved game is not a valid position: {}", reason),
        }
    }
}
impl Error for SaveLoadError {}

#[derive(Debug)]
pub enum CommandError {
    UnknownCommand(String),
    InvalidFormat(String),
    Move(ChessError),
    SaveLoad(SaveLoadError),
}
impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(cmd) => write!(f, "Unknown command: '{}'. Type 'help' for commands.", cmd),
            CommandError::InvalidFormat(input) => write!(f, "Invalid format: '{}'. Use moves like 'e2e4' or 'a7a8q'.", input),
            CommandError::Move(e) => write!(f, "{}", e),
            CommandError::SaveLoad(e) => write!(f, "{}", e),
        }
    }
}
impl Error for CommandError {}

impl From<ChessError> for CommandError {
    fn from(e: ChessError) -> Self { CommandError::Move(e) }
}
impl From<SaveLoadError> for CommandError {
    fn from(e: SaveLoadError) -> Self { CommandError::SaveLoad(e) }
}

// --- Persistence ---

fn save_game(engine: &GameEngine, filename: &str) -> Result<(), SaveLoadError> {
    let json_data = serde_json::to_string_pretty(engine.state())
        .map_err(SaveLoadError::Serialization)?;
    fs::write(filename, json_data)
        .map_err(|e| SaveLoadError::Io(filename.to_string(), e))
}

fn load_game(filename: &str) -> Result<GameEngine, SaveLoadError> {
    let json_data = fs::read_to_string(filename)
        .map_err(|e| SaveLoadError::Io(filename.to_string(), e))?;
    let state: GameState = serde_json::from_str(&json_data)
        .map_err(SaveLoadError::Serialization)?;
    validate_state(&state)?;
    Ok(GameEngine::from_state(state))
}

/// Rejects snapshots the rules could not have produced: a missing or extra king,
/// or an en-passant square that is not the one a pawn of the side that just moved skipped.
fn validate_state(state: &GameState) -> Result<(), SaveLoadError> {
    for color in [Color::White, Color::Black] {
        let kings = state.board.pieces()
            .filter(|(_, p)| *p == Piece::new(color, PieceType::King))
            .count();
        if kings != 1 {
            return Err(SaveLoadError::InvalidState(format!("{:?} has {} kings", color, kings)));
        }
    }
    if let Some(ep) = state.en_passant {
        let expected_row = match state.turn { Color::Black => 3, Color::White => 6 };
        if !ep.is_on_board() || ep.row() != expected_row {
            return Err(SaveLoadError::InvalidState(format!(
                "en passant square {} with {:?} to move", position_to_algebraic(ep), state.turn
            )));
        }
    }
    Ok(())
}

// --- Input Parsing ---

#[derive(Debug, PartialEq)]
enum Command {
    Move(Move),
    Moves(Position),
    Board,
    Turn,
    Save(String),
    Load(String),
    Reset,
    Help,
    Quit,
}

fn parse_command(input: &str) -> Result<Command, CommandError> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or("").to_lowercase();
    let argument = parts.next().unwrap_or("").trim();
    let file_or_default = || (if argument.is_empty() { DEFAULT_SAVE_FILENAME } else { argument }).to_string();

    match word.as_str() {
        "moves" => algebraic_to_position(&argument.to_lowercase())
            .map(Command::Moves)
            .ok_or_else(|| CommandError::InvalidFormat(argument.to_string())),
        "board" => Ok(Command::Board),
        "turn" => Ok(Command::Turn),
        "save" => Ok(Command::Save(file_or_default())),
        "load" => Ok(Command::Load(file_or_default())),
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ if MOVE_PATTERN.is_match(&word) => parse_move_algebraic(&word).map(Command::Move),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn announce_status(engine: &GameEngine) -> bool {
    match engine.status() {
        GameStatus::Checkmate(loser) => {
            println!("\n=== GAME OVER: Checkmate. {:?} wins. ===", loser.opponent());
            true
        }
        GameStatus::Stalemate(color) => {
            println!("\n=== GAME OVER: Stalemate, {:?} has no legal move. ===", color);
            true
        }
        GameStatus::Check(color) => {
            println!("{:?} is in check.", color);
            false
        }
        GameStatus::Ongoing => false,
    }
}

/// Runs one command. Returns `Ok(true)` when the session should end.
fn execute(engine: &mut GameEngine, command: Command) -> Result<bool, CommandError> {
    match command {
        Command::Move(mv) => {
            engine.make_move(mv)?;
            println!("{}", render_board(engine));
            return Ok(announce_status(engine));
        }
        Command::Moves(pos) => {
            let moves: Vec<String> = engine.valid_moves(pos).iter().map(move_to_algebraic).collect();
            if moves.is_empty() {
                println!("No legal moves from {}.", position_to_algebraic(pos));
            } else {
                println!("Legal moves: {}", moves.join(" "));
            }
        }
        Command::Board => println!("{}", render_board(engine)),
        Command::Turn => println!("{:?} to move.", engine.turn()),
        Command::Save(filename) => {
            save_game(engine, &filename)?;
            println!("Game saved to '{}'.", filename);
        }
        Command::Load(filename) => {
            *engine = load_game(&filename)?;
            println!("Game loaded from '{}'.", filename);
            println!("{}", render_board(engine));
        }
        Command::Reset => {
            engine.reset();
            println!("{}", render_board(engine));
        }
        Command::Help => print_help(),
        Command::Quit => {
            println!("Exiting game.");
            return Ok(true);
        }
    }
    Ok(false)
}

// --- Main Loop ---

fn main() -> Result<(), Box<dyn Error>> {
    let mut engine = match env::args().nth(1) {
        Some(path) => load_game(&path)?,
        None => GameEngine::new(),
    };

    println!("==============================");
    println!("|        Rust Chess          |");
    println!("==============================");
    print_help();
    println!("{}", render_board(&engine));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{:?}'s turn. Enter move or command: ", engine.turn());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
            None => {
                println!("\nEnd of input detected. Quitting game.");
                break;
            }
        };
        if line.trim().is_empty() { continue; }

        match parse_command(&line).and_then(|command| execute(&mut engine, command)) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("\nGame session finished.");
    Ok(())
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  <move>          Move in coordinate notation (e.g., e2e4, e1g1 to castle, a7a8q to promote).");
    println!("  moves <square>  List the legal moves of the piece on a square.");
    println!("  board           Show the board.");
    println!("  turn            Show whose turn it is.");
    println!("  save [file]     Save the game (default: {}).", DEFAULT_SAVE_FILENAME);
    println!("  load [file]     Load a saved game (default: {}).", DEFAULT_SAVE_FILENAME);
    println!("  reset           Start over from the initial position.");
    println!("  help            Show this help message.");
    println!("  quit / exit     Exit.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_and_promotions() {
        assert_eq!(
            parse_move_algebraic("e2e4").unwrap(),
            Move::new(Position::new(2, 5), Position::new(4, 5), None)
        );
        assert_eq!(
            parse_move_algebraic("A7A8Q").unwrap(),
            Move::new(Position::new(7, 1), Position::new(8, 1), Some(PieceType::Queen))
        );
        assert!(parse_move_algebraic("e2e9").is_err());
        assert!(parse_move_algebraic("e7e8k").is_err());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("moves e2").unwrap(), Command::Moves(Position::new(2, 5)));
        assert_eq!(parse_command("save").unwrap(), Command::Save(DEFAULT_SAVE_FILENAME.to_string()));
        assert_eq!(parse_command("load game.json").unwrap(), Command::Load("game.json".to_string()));
        assert!(matches!(parse_command("castle"), Err(CommandError::UnknownCommand(_))));
    }

    #[test]
    fn renders_start_position() {
        let board = render_board(&GameEngine::new());
        assert!(board.contains("8 | r n b q k b n r |"));
        assert!(board.contains("1 | R N B Q K B N R |"));
    }

    fn write_save(dir: &tempfile::TempDir, state: &GameState) -> String {
        let path = dir.path().join("save.json");
        fs::write(&path, serde_json::to_string(state).unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn load_rejects_off_board_en_passant_square() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = GameEngine::new().state().clone();
        state.en_passant = Some(Position::new(3, 0));
        let path = write_save(&dir, &state);
        assert!(matches!(load_game(&path), Err(SaveLoadError::InvalidState(_))));

        state.en_passant = Some(Position::new(4, 5));
        let path = write_save(&dir, &state);
        assert!(matches!(load_game(&path), Err(SaveLoadError::InvalidState(_))));
        assert_eq!(position_to_algebraic(Position::new(3, 0)), "(3, 0)");
    }

    #[test]
    fn load_rejects_missing_king() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = GameEngine::new().state().clone();
        state.board.place(Position::new(8, 5), None).unwrap();
        let path = write_save(&dir, &state);
        assert!(matches!(load_game(&path), Err(SaveLoadError::InvalidState(_))));
    }

    #[test]
    fn load_accepts_a_real_en_passant_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = GameEngine::new();
        engine.make_move(Move::new(Position::new(2, 5), Position::new(4, 5), None)).unwrap();
        let path = write_save(&dir, engine.state());
        let loaded = load_game(&path).unwrap();
        assert_eq!(&loaded, &engine);
        assert!(render_board(&loaded).contains("En Passant Target: e3"));
    }

    #[test]
    fn algebraic_names_round_trip() {
        for pos in Position::all() {
            assert_eq!(algebraic_to_position(&position_to_algebraic(pos)), Some(pos));
        }
    }
}
