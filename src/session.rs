//! Line-oriented session protocol.
//!
//! One session drives one board. Commands are read one per line and answered
//! in the GTP style: `=id response` on success, `?id message` on failure,
//! followed by a blank line. Because the loop handles one line at a time,
//! turns on the board are naturally serialised.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return the protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `newgame <height> <width>` - Start a new empty board
//! - `addplayer <id>` - Register a player
//! - `play <id> <row> <col>` - Place a stone and report what it changed
//! - `showboard` - Render the board
//! - `score` - Print the score table as `id:points` pairs
//! - `isfull` - Whether every playable cell is taken
//! - `loops` - List both loop registries
//! - `snapshot` - Print the board as JSON
//! - `restore <json>` - Replace the board with a stored one
//!
//! ## Example
//!
//! ```ignore
//! use dots_rules::session::Session;
//! let mut session = Session::new(10, 10)?;
//! session.run()?;
//! ```

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::board::{Board, BoardError, Coord, PlayerId};
use crate::capture::LoopKind;
use crate::game::{place_stone, TurnOutcome};
use crate::ownership::{is_board_full, register_player};
use crate::registry::LoopRegistry;
use crate::snapshot;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "addplayer",
    "isfull",
    "known_command",
    "list_commands",
    "loops",
    "name",
    "newgame",
    "play",
    "protocol_version",
    "quit",
    "restore",
    "score",
    "showboard",
    "snapshot",
    "version",
];

/// Session state.
pub struct Session {
    board: Board,
}

impl Session {
    /// Create a session on an empty `height` x `width` board.
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        Ok(Self::with_board(Board::new(height, width)?))
    }

    /// Create a session around an existing board.
    pub fn with_board(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the command loop over any line source and sink.
    ///
    /// Stops at `quit` or at the end of the input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "newgame" => {
                let [height, width] = args else {
                    return (false, "expected <height> <width>".to_string());
                };
                let (Ok(height), Ok(width)) = (height.parse::<usize>(), width.parse::<usize>()) else {
                    return (false, "invalid size".to_string());
                };
                match Board::new(height, width) {
                    Ok(board) => {
                        info!(height, width, "new game");
                        self.board = board;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "addplayer" => {
                let Some(Ok(id)) = args.first().map(|a| a.parse::<PlayerId>()) else {
                    return (false, "expected <id>".to_string());
                };
                match register_player(&mut self.board, id) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "play" => {
                let [id, row, col] = args else {
                    return (false, "expected <id> <row> <col>".to_string());
                };
                let (Ok(id), Ok(row), Ok(col)) = (
                    id.parse::<PlayerId>(),
                    row.parse::<usize>(),
                    col.parse::<usize>(),
                ) else {
                    return (false, "invalid arguments".to_string());
                };
                match place_stone(&mut self.board, Coord::new(row, col), id) {
                    Ok(outcome) => (true, describe_turn(&outcome)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.board)),

            "score" => {
                let pairs: Vec<String> = self
                    .board
                    .score()
                    .iter()
                    .map(|(id, points)| format!("{id}:{points}"))
                    .collect();
                (true, pairs.join(" "))
            }

            "isfull" => (true, is_board_full(&self.board).to_string()),

            "loops" => {
                let mut lines = Vec::new();
                describe_registry(&mut lines, "captured", self.board.loops());
                describe_registry(&mut lines, "empty", self.board.empty_loops());
                (true, lines.join("\n"))
            }

            "snapshot" => match snapshot::to_json(&self.board) {
                Ok(json) => (true, json),
                Err(e) => (false, e.to_string()),
            },

            "restore" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match snapshot::from_json(&args.join(" ")) {
                    Ok(board) => {
                        self.board = board;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

/// Summarise a turn as space separated `capture:<id>`, `claim:<id>` and `promote:<id>` tokens.
fn describe_turn(outcome: &TurnOutcome) -> String {
    if !outcome.claimed {
        return "ignored".to_string();
    }
    let mut tokens: Vec<String> = outcome
        .resolutions
        .iter()
        .map(|r| match r.kind {
            LoopKind::Capturing => format!("capture:{}", r.id),
            LoopKind::Empty => format!("claim:{}", r.id),
        })
        .collect();
    if let Some(p) = &outcome.promotion {
        tokens.push(format!("promote:{}", p.id));
    }
    tokens.join(" ")
}

fn describe_registry(lines: &mut Vec<String>, label: &str, registry: &LoopRegistry) {
    for (id, points) in registry.iter() {
        let coords: Vec<String> = points.iter().map(Coord::to_string).collect();
        lines.push(format!("{label} {id}: {}", coords.join(" ")));
    }
}
