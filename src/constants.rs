//! Rule constants and board geometry parameters.
//!
//! The board is stored as a 1D array with a one-cell border ring around the
//! playable area, so every playable cell has all eight neighbours allocated.
//!
//! # Layout
//!
//! For a board of `height` x `width` playable cells the array holds
//! `(height + 2) * (width + 2)` cells in row-major order. Row `0`, row
//! `height + 1`, column `0` and column `width + 1` are border cells.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest accepted playable height and width.
pub const MIN_FIELD_SIZE: usize = 5;

/// Thickness of the border ring on each side of the playable area.
pub const BORDER: usize = 1;

/// Default playable height of a `session` board.
pub const DEFAULT_HEIGHT: usize = 10;

/// Default playable width of a `session` board.
pub const DEFAULT_WIDTH: usize = 10;

// =============================================================================
// Neighbour Offsets
// =============================================================================

/// King-move offsets `(d_row, d_col)` in row-major order.
///
/// Loop discovery walks neighbours in exactly this order, which is what makes
/// the list of discovered loops deterministic.
pub const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// =============================================================================
// Loop Detection
// =============================================================================

/// A path must hold at least this many coordinates before it can close a loop.
pub const MIN_LOOP_LEN: usize = 4;

/// Paths whose polygon area does not exceed this are treated as degenerate.
///
/// A 2x2 block of stones has area exactly 1.0 and encloses nothing.
pub const MIN_LOOP_AREA: f64 = 1.0;

// =============================================================================
// Render Glyphs
// =============================================================================

/// Border ring.
pub const GLYPH_BORDER: char = '+';

/// Free cell.
pub const GLYPH_EMPTY: char = '.';

/// Unowned cell that sits inside a capture.
pub const GLYPH_CAPTURED_EMPTY: char = ',';

/// Stone glyphs by player registration order; lowercase marks a captured stone.
pub const PLAYER_GLYPHS: &[u8] = b"XOABCDEFGHJKLMNPQRSTUVWYZ";

/// Glyph for players beyond [`PLAYER_GLYPHS`].
pub const GLYPH_UNKNOWN: char = '?';
