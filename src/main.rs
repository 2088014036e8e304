//! Dots-Rules: command line front end.
//!
//! ## Usage
//!
//! - `dots-rules` - Show a demo
//! - `dots-rules session` - Start the line protocol on stdin/stdout
//! - `dots-rules demo` - Play a scripted game and print each step
//!
//! Logs go to stderr. `--log-level` sets the default filter and `RUST_LOG`
//! overrides it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dots_rules::board::{Board, Coord, PlayerId};
use dots_rules::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use dots_rules::game::{place_stone, TurnOutcome};
use dots_rules::ownership::register_player;
use dots_rules::session::Session;

/// Dots-Rules: rules engine for the game of Dots
#[derive(Parser)]
#[command(name = "dots-rules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Default log filter, e.g. `info` or `dots_rules=debug`
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a board with line commands on stdin
    Session {
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: usize,
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },
    /// Play a short scripted game
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Session { height, width }) => {
            info!(height, width, "starting session");
            let mut session = Session::new(height, width)?;
            session.run()?;
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Dots-Rules: territory capture demo\n");

    let mut board = Board::new(6, 7)?;
    register_player(&mut board, 1)?;
    register_player(&mut board, 2)?;

    println!("=== Capture ===");
    play(&mut board, 2, &[(3, 2)])?;
    play(&mut board, 1, &[(2, 2), (3, 1), (3, 3), (4, 2)])?;
    println!("{board}");

    println!("=== Claim ===");
    play(&mut board, 1, &[(2, 5), (3, 4), (3, 6), (4, 5)])?;
    println!("{board}");

    println!("=== Promotion ===");
    play(&mut board, 2, &[(3, 5)])?;
    println!("{board}");

    for (id, points) in board.score() {
        println!("Player {id}: {points}");
    }
    Ok(())
}

fn play(board: &mut Board, owner: PlayerId, stones: &[(usize, usize)]) -> Result<()> {
    for &c in stones {
        let c = Coord::from(c);
        let outcome = place_stone(board, c, owner)?;
        report(owner, c, &outcome);
    }
    Ok(())
}

fn report(owner: PlayerId, c: Coord, outcome: &TurnOutcome) {
    for r in outcome.resolutions.iter() {
        println!("Player {owner} at {c}: loop {} {:?}, {} cells", r.id, r.kind, r.interior);
    }
    if let Some(p) = &outcome.promotion {
        println!("Player {owner} at {c}: loop {} promoted {:?}, {} cells", p.id, p.kind, p.interior);
    }
}
