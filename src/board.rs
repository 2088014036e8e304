//! Board model: coordinates, cells and the padded grid.
//!
//! Cells are stored in a 1D array with a border ring around the playable
//! area (see [`crate::constants`]). Border cells are the payload-free
//! [`Cell::Border`] variant and never change after construction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::registry::LoopRegistry;

/// Player identifier.
pub type PlayerId = u32;

/// A grid position, `(row, col)`, including the border ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// King-move adjacency: distinct cells whose row and column each differ by at most one.
    pub fn is_neighbour(self, other: Coord) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// Shift by a signed offset, `None` when it would leave the non-negative quadrant.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Coord> {
        Some(Coord::new(
            self.row.checked_add_signed(d_row)?,
            self.col.checked_add_signed(d_col)?,
        ))
    }

    /// The eight king-move neighbours in row-major order.
    pub fn neighbours(self) -> impl Iterator<Item = Coord> {
        KING_OFFSETS
            .iter()
            .filter_map(move |&(d_row, d_col)| self.offset(d_row, d_col))
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord::new(row, col)
    }
}

impl From<Coord> for (usize, usize) {
    fn from(c: Coord) -> Self {
        (c.row, c.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a playable cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dot {
    /// Player who placed a stone here. Set once, never cleared.
    pub owner: Option<PlayerId>,
    /// Capture history, oldest first. Append-only.
    pub captured: Vec<PlayerId>,
}

impl Dot {
    pub fn is_captured(&self) -> bool {
        !self.captured.is_empty()
    }

    /// The most recent capturer.
    pub fn last_capturer(&self) -> Option<PlayerId> {
        self.captured.last().copied()
    }
}

/// One grid position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Border,
    Open(Dot),
}

impl Cell {
    pub fn is_border(&self) -> bool {
        matches!(self, Cell::Border)
    }

    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Cell::Border => None,
            Cell::Open(dot) => dot.owner,
        }
    }

    pub fn captured(&self) -> &[PlayerId] {
        match self {
            Cell::Border => &[],
            Cell::Open(dot) => &dot.captured,
        }
    }

    pub fn dot(&self) -> Option<&Dot> {
        match self {
            Cell::Border => None,
            Cell::Open(dot) => Some(dot),
        }
    }
}

/// Errors raised by board operations. All of them are raised before any mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Either playable dimension is below the minimum of 5
    #[error("board must be at least 5x5, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    /// The player id was never registered on this board
    #[error("player {0} is not registered on this board")]
    UnknownPlayer(PlayerId),

    /// The coordinate lies outside the allocated grid
    #[error("coordinate {0} is outside the board")]
    OutOfBounds(Coord),
}

/// The game board.
///
/// Holds the padded grid, the player registry, both loop registries and the
/// score table. Operations that change game state are free functions in
/// [`crate::ownership`], [`crate::capture`] and [`crate::game`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
    players: Vec<PlayerId>,
    loops: LoopRegistry,
    empty_loops: LoopRegistry,
    score: BTreeMap<PlayerId, u32>,
}

impl Board {
    /// Create an empty board with `height` x `width` playable cells.
    ///
    /// # Errors
    /// [`BoardError::InvalidDimensions`] if either dimension is below [`MIN_FIELD_SIZE`].
    pub fn new(height: usize, width: usize) -> Result<Self, BoardError> {
        if height < MIN_FIELD_SIZE || width < MIN_FIELD_SIZE {
            return Err(BoardError::InvalidDimensions { height, width });
        }

        let rows = height + 2 * BORDER;
        let cols = width + 2 * BORDER;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let on_ring = row == 0 || row == rows - 1 || col == 0 || col == cols - 1;
                cells.push(if on_ring {
                    Cell::Border
                } else {
                    Cell::Open(Dot::default())
                });
            }
        }

        Ok(Self {
            height,
            width,
            cells,
            players: Vec::new(),
            loops: LoopRegistry::new(),
            empty_loops: LoopRegistry::new(),
            score: BTreeMap::new(),
        })
    }

    /// Assemble a board from already validated parts (snapshot hydration).
    pub(crate) fn from_parts(
        height: usize,
        width: usize,
        cells: Vec<Cell>,
        players: Vec<PlayerId>,
        loops: LoopRegistry,
        empty_loops: LoopRegistry,
        score: BTreeMap<PlayerId, u32>,
    ) -> Self {
        Self {
            height,
            width,
            cells,
            players,
            loops,
            empty_loops,
            score,
        }
    }

    /// Playable height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Playable width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Allocated rows, border included.
    pub fn rows(&self) -> usize {
        self.height + 2 * BORDER
    }

    /// Allocated columns, border included.
    pub fn cols(&self) -> usize {
        self.width + 2 * BORDER
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.row < self.rows() && c.col < self.cols()
    }

    fn idx(&self, c: Coord) -> usize {
        c.row * self.cols() + c.col
    }

    /// The cell at `c`, or `None` outside the grid.
    pub fn get(&self, c: Coord) -> Option<&Cell> {
        if !self.contains(c) {
            return None;
        }
        self.cells.get(self.idx(c))
    }

    /// The cell at `c`.
    ///
    /// # Errors
    /// [`BoardError::OutOfBounds`] outside the grid.
    pub fn cell(&self, c: Coord) -> Result<&Cell, BoardError> {
        self.get(c).ok_or(BoardError::OutOfBounds(c))
    }

    pub(crate) fn cell_mut(&mut self, c: Coord) -> Result<&mut Cell, BoardError> {
        if !self.contains(c) {
            return Err(BoardError::OutOfBounds(c));
        }
        let i = self.idx(c);
        self.cells.get_mut(i).ok_or(BoardError::OutOfBounds(c))
    }

    /// Mutable access to a playable cell; `None` for border or out-of-grid coordinates.
    pub(crate) fn dot_mut(&mut self, c: Coord) -> Option<&mut Dot> {
        match self.cell_mut(c) {
            Ok(Cell::Open(dot)) => Some(dot),
            _ => None,
        }
    }

    /// Owner of the stone at `c`, if any.
    pub fn owner_at(&self, c: Coord) -> Option<PlayerId> {
        self.get(c).and_then(Cell::owner)
    }

    /// Every playable coordinate in row-major order.
    pub fn interior_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (BORDER..BORDER + self.height)
            .flat_map(move |row| (BORDER..BORDER + self.width).map(move |col| Coord::new(row, col)))
    }

    /// All rows of the grid, border included.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols())
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }

    pub(crate) fn players_mut(&mut self) -> &mut Vec<PlayerId> {
        &mut self.players
    }

    /// Registry of loops that captured something.
    pub fn loops(&self) -> &LoopRegistry {
        &self.loops
    }

    pub(crate) fn loops_mut(&mut self) -> &mut LoopRegistry {
        &mut self.loops
    }

    /// Registry of loops that enclose only unclaimed cells.
    pub fn empty_loops(&self) -> &LoopRegistry {
        &self.empty_loops
    }

    pub(crate) fn empty_loops_mut(&mut self) -> &mut LoopRegistry {
        &mut self.empty_loops
    }

    pub fn score(&self) -> &BTreeMap<PlayerId, u32> {
        &self.score
    }

    /// Score of one player, `None` if the player has no entry.
    pub fn score_of(&self, id: PlayerId) -> Option<u32> {
        self.score.get(&id).copied()
    }

    pub(crate) fn score_mut(&mut self) -> &mut BTreeMap<PlayerId, u32> {
        &mut self.score
    }

    fn glyph(&self, cell: &Cell) -> char {
        match cell {
            Cell::Border => GLYPH_BORDER,
            Cell::Open(Dot { owner: None, captured }) if captured.is_empty() => GLYPH_EMPTY,
            Cell::Open(Dot { owner: None, .. }) => GLYPH_CAPTURED_EMPTY,
            Cell::Open(Dot {
                owner: Some(id),
                captured,
            }) => {
                let glyph = self
                    .players
                    .iter()
                    .position(|p| p == id)
                    .and_then(|i| PLAYER_GLYPHS.get(i))
                    .map_or(GLYPH_UNKNOWN, |&b| b as char);
                if captured.is_empty() {
                    glyph
                } else {
                    glyph.to_ascii_lowercase()
                }
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for cell in row {
                write!(f, "{} ", self.glyph(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_include_border() {
        let board = Board::new(5, 10).unwrap();
        assert_eq!(board.rows(), 7);
        assert_eq!(board.cols(), 12);
        assert_eq!(board.rows_iter().count(), 7);
        assert!(board.rows_iter().all(|row| row.len() == 12));
    }

    #[test]
    fn test_border_ring() {
        let board = Board::new(5, 10).unwrap();
        for col in 0..board.cols() {
            assert!(board.get(Coord::new(0, col)).unwrap().is_border());
            assert!(board.get(Coord::new(6, col)).unwrap().is_border());
        }
        for row in 0..board.rows() {
            assert!(board.get(Coord::new(row, 0)).unwrap().is_border());
            assert!(board.get(Coord::new(row, 11)).unwrap().is_border());
        }
    }

    #[test]
    fn test_interior_starts_empty() {
        let board = Board::new(5, 10).unwrap();
        assert_eq!(board.interior_coords().count(), 50);
        for c in board.interior_coords() {
            let cell = board.get(c).unwrap();
            assert!(!cell.is_border());
            assert_eq!(cell.owner(), None);
            assert!(cell.captured().is_empty());
        }
        assert!(board.players().is_empty());
        assert!(board.loops().is_empty());
        assert!(board.empty_loops().is_empty());
        assert!(board.score().is_empty());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Board::new(0, 0),
            Err(BoardError::InvalidDimensions { height: 0, width: 0 })
        );
        assert!(Board::new(4, 5).is_err());
        assert!(Board::new(5, 4).is_err());
        assert!(Board::new(5, 5).is_ok());
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new(5, 5).unwrap();
        let far = Coord::new(20, 3);
        assert_eq!(board.cell(far), Err(BoardError::OutOfBounds(far)));
        assert!(board.get(Coord::new(7, 0)).is_none());
        assert!(board.get(Coord::new(6, 6)).is_some());
    }

    #[test]
    fn test_is_neighbour() {
        let center = Coord::new(3, 3);
        for row in 2..=4 {
            for col in 2..=4 {
                let other = Coord::new(row, col);
                assert_eq!(center.is_neighbour(other), other != center);
            }
        }
        for far in [Coord::new(1, 1), Coord::new(3, 5), Coord::new(2, 1)] {
            assert!(!center.is_neighbour(far));
        }
    }

    #[test]
    fn test_neighbours_row_major_and_clipped() {
        let got: Vec<Coord> = Coord::new(1, 1).neighbours().collect();
        assert_eq!(got.first(), Some(&Coord::new(0, 0)));
        assert_eq!(got.last(), Some(&Coord::new(2, 2)));
        assert_eq!(got.len(), 8);

        // No negative coordinates around the origin.
        assert_eq!(Coord::new(0, 0).neighbours().count(), 3);
    }

    #[test]
    fn test_display_shape() {
        let board = Board::new(5, 6).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].chars().all(|c| c == GLYPH_BORDER || c == ' '));
        assert!(lines[1].contains(GLYPH_EMPTY));
    }
}
