//! Dots-Rules: the rules engine of a Dots territory game.
//!
//! Players take turns putting stones on a rectangular grid. A player who
//! closes a ring of their own stones around an opponent's stones captures
//! them; a ring around nothing but free cells claims that area until an
//! opponent steps inside.
//!
//! ## Modules
//!
//! - [`constants`] - Grid limits, neighbourhood offsets and glyphs
//! - [`board`] - Padded grid, cells and per-board state
//! - [`registry`] - Numbered loop registries
//! - [`ownership`] - Players, stone placement and fullness
//! - [`geometry`] - Polygon area and point-in-polygon test
//! - [`discovery`] - Depth-first search for newly closed loops
//! - [`capture`] - Loop classification, capture and scoring
//! - [`game`] - One complete turn
//! - [`snapshot`] - Storage shape and JSON conversion
//! - [`session`] - Line-oriented command protocol
//!
//! ## Example
//!
//! ```
//! use dots_rules::board::{Board, Coord};
//! use dots_rules::game::place_stone;
//! use dots_rules::ownership::register_player;
//!
//! let mut board = Board::new(5, 5)?;
//! register_player(&mut board, 1)?;
//! register_player(&mut board, 2)?;
//!
//! // Surround a stone of player 2
//! place_stone(&mut board, Coord::new(3, 2), 2)?;
//! for c in [(2, 2), (3, 1), (3, 3), (4, 2)] {
//!     place_stone(&mut board, Coord::from(c), 1)?;
//! }
//! assert_eq!(board.score_of(1), Some(1));
//! println!("{board}");
//! # Ok::<(), dots_rules::board::BoardError>(())
//! ```

pub mod board;
pub mod capture;
pub mod constants;
pub mod discovery;
pub mod game;
pub mod geometry;
pub mod ownership;
pub mod registry;
pub mod session;
pub mod snapshot;
