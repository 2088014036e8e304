//! Flattened board representation for storage.
//!
//! [`BoardSnapshot`] carries exactly the fields a storage layer needs to
//! persist and restore a game: the grid rows, the player list, both loop
//! registries and the score table. Conversion back into a [`Board`] checks
//! the shape of the data before anything is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardError, Cell, Coord, Dot, PlayerId};
use crate::constants::{BORDER, MIN_FIELD_SIZE};
use crate::registry::{LoopId, LoopRegistry};

/// Errors raised while restoring a board.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// One stored cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub owner: Option<PlayerId>,
    /// `None` when the cell was never captured.
    pub captured: Option<Vec<PlayerId>>,
    pub border: bool,
}

/// A whole stored board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub field: Vec<Vec<CellRecord>>,
    pub players: Vec<PlayerId>,
    pub loops: BTreeMap<LoopId, Vec<Coord>>,
    pub empty_loops: BTreeMap<LoopId, Vec<Coord>>,
    pub score: BTreeMap<PlayerId, u32>,
}

impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Border => CellRecord {
                border: true,
                ..CellRecord::default()
            },
            Cell::Open(dot) => CellRecord {
                owner: dot.owner,
                captured: dot.is_captured().then(|| dot.captured.clone()),
                border: false,
            },
        }
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        BoardSnapshot {
            field: board
                .rows_iter()
                .map(|row| row.iter().map(CellRecord::from).collect())
                .collect(),
            players: board.players().to_vec(),
            loops: board.loops().clone().into(),
            empty_loops: board.empty_loops().clone().into(),
            score: board.score().clone(),
        }
    }
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = SnapshotError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        let rows = snapshot.field.len();
        let cols = snapshot.field.first().map_or(0, Vec::len);
        let height = rows.saturating_sub(2 * BORDER);
        let width = cols.saturating_sub(2 * BORDER);
        if height < MIN_FIELD_SIZE || width < MIN_FIELD_SIZE {
            return Err(BoardError::InvalidDimensions { height, width }.into());
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, records) in snapshot.field.into_iter().enumerate() {
            if records.len() != cols {
                return Err(SnapshotError::Malformed(format!(
                    "row {row} has {} cells, expected {cols}",
                    records.len()
                )));
            }
            for (col, record) in records.into_iter().enumerate() {
                let on_ring = row == 0 || row == rows - 1 || col == 0 || col == cols - 1;
                cells.push(restore_cell(Coord::new(row, col), record, on_ring)?);
            }
        }

        let loops = restore_registry(snapshot.loops, rows, cols)?;
        let empty_loops = restore_registry(snapshot.empty_loops, rows, cols)?;

        Ok(Board::from_parts(
            height,
            width,
            cells,
            snapshot.players,
            loops,
            empty_loops,
            snapshot.score,
        ))
    }
}

fn restore_cell(c: Coord, record: CellRecord, on_ring: bool) -> Result<Cell, SnapshotError> {
    match (on_ring, record.border) {
        (true, true) => {
            if record.owner.is_some() || record.captured.is_some() {
                return Err(SnapshotError::Malformed(format!("border cell {c} carries state")));
            }
            Ok(Cell::Border)
        }
        (false, false) => Ok(Cell::Open(Dot {
            owner: record.owner,
            captured: record.captured.unwrap_or_default(),
        })),
        (true, false) => Err(SnapshotError::Malformed(format!(
            "cell {c} lies on the border ring but is not marked as border"
        ))),
        (false, true) => Err(SnapshotError::Malformed(format!(
            "cell {c} is marked as border inside the field"
        ))),
    }
}

fn restore_registry(
    entries: BTreeMap<LoopId, Vec<Coord>>,
    rows: usize,
    cols: usize,
) -> Result<LoopRegistry, SnapshotError> {
    if entries.contains_key(&0) {
        return Err(SnapshotError::Malformed("loop ids start at 1".to_string()));
    }
    if let Some(&c) = entries
        .values()
        .flatten()
        .find(|c| c.row >= rows || c.col >= cols)
    {
        return Err(BoardError::OutOfBounds(c).into());
    }
    Ok(LoopRegistry::from(entries))
}

/// Serialise a board to JSON.
pub fn to_json(board: &Board) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&BoardSnapshot::from(board))?)
}

/// Restore a board from JSON produced by [`to_json`].
pub fn from_json(json: &str) -> Result<Board, SnapshotError> {
    let snapshot: BoardSnapshot = serde_json::from_str(json)?;
    Board::try_from(snapshot)
}
