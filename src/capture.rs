//! Capture resolution and scoring.
//!
//! A candidate loop is resolved in three steps:
//! 1. [`collect_interior`] gathers the cells strictly inside the loop that
//!    could change hands.
//! 2. [`classify`] decides whether the loop captures, claims empty territory,
//!    or is discarded.
//! 3. [`commit`] stores the loop in the matching registry and, for captures,
//!    extends capture histories and recomputes the score table.

use std::collections::BTreeMap;

use tracing::debug;

use crate::board::{Board, Cell, Coord, PlayerId};
use crate::constants::BORDER;
use crate::geometry;
use crate::registry::{point_set, LoopId};

/// How a loop with a non-empty interior is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopKind {
    /// The interior holds at least one foreign stone.
    Capturing,
    /// The interior holds no stones at all.
    Empty,
}

/// A committed loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Registry id now covering the loop.
    pub id: LoopId,
    pub kind: LoopKind,
    /// Number of interior cells involved.
    pub interior: usize,
}

/// Cells strictly inside `loop_points` that are not plain uncaptured stones of `owner`.
///
/// Only the bounding box of the loop is scanned; cells outside it cannot be inside.
pub fn collect_interior(board: &Board, loop_points: &[Coord], owner: PlayerId) -> Vec<Coord> {
    let Some((min_row, max_row, min_col, max_col)) = geometry::bounds(loop_points) else {
        return Vec::new();
    };
    let min_row = min_row.max(BORDER);
    let min_col = min_col.max(BORDER);
    let max_row = max_row.min(board.height());
    let max_col = max_col.min(board.width());

    let mut interior = Vec::new();
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            let c = Coord::new(row, col);
            let Some(Cell::Open(dot)) = board.get(c) else {
                continue;
            };
            let counts = dot.owner != Some(owner) || dot.is_captured();
            if counts && geometry::contains(loop_points, c) {
                interior.push(c);
            }
        }
    }
    interior
}

/// Classify a loop by its interior. `None` means the loop is discarded.
pub fn classify(board: &Board, interior: &[Coord], owner: PlayerId) -> Option<LoopKind> {
    if interior.is_empty() {
        return None;
    }

    let owners = || interior.iter().map(|&c| board.owner_at(c));
    if owners().any(|o| o.is_some_and(|o| o != owner)) {
        Some(LoopKind::Capturing)
    } else if owners().all(|o| o.is_none()) {
        Some(LoopKind::Empty)
    } else {
        None
    }
}

/// Store a classified loop and apply its effects.
pub fn commit(
    board: &mut Board,
    loop_points: Vec<Coord>,
    interior: &[Coord],
    owner: PlayerId,
    kind: LoopKind,
) -> LoopId {
    match kind {
        LoopKind::Capturing => {
            let id = board.loops_mut().register(loop_points);
            for &c in interior {
                if let Some(dot) = board.dot_mut(c) {
                    dot.captured.push(owner);
                }
            }
            recompute_score(board);
            debug!(id, owner, cells = interior.len(), "capturing loop committed");
            id
        }
        LoopKind::Empty => {
            let id = board.empty_loops_mut().register(loop_points);
            debug!(id, owner, cells = interior.len(), "empty loop claimed");
            id
        }
    }
}

/// Run [`collect_interior`], [`classify`] and [`commit`] for one loop.
pub fn resolve_loop(board: &mut Board, loop_points: Vec<Coord>, owner: PlayerId) -> Option<Resolution> {
    let interior = collect_interior(board, &loop_points, owner);
    let kind = classify(board, &interior, owner)?;
    let id = commit(board, loop_points, &interior, owner, kind);
    Some(Resolution {
        id,
        kind,
        interior: interior.len(),
    })
}

/// Rebuild the score table from capture histories.
///
/// A stone scores one point for its most recent capturer, unless that
/// capturer is the stone's own owner.
pub fn recompute_score(board: &mut Board) {
    let mut score: BTreeMap<PlayerId, u32> = board.players().iter().map(|&p| (p, 0)).collect();

    for c in board.interior_coords() {
        let Some(dot) = board.get(c).and_then(Cell::dot) else {
            continue;
        };
        if let (Some(owner), Some(capturer)) = (dot.owner, dot.last_capturer()) {
            if owner != capturer {
                *score.entry(capturer).or_insert(0) += 1;
            }
        }
    }

    *board.score_mut() = score;
}

/// Id of the smallest claimed-empty loop strictly containing `c`.
///
/// Smallest means fewest boundary points; ties go to the lowest id.
pub fn find_enclosing_empty_loop(board: &Board, c: Coord) -> Option<LoopId> {
    board
        .empty_loops()
        .iter()
        .filter(|(_, points)| geometry::contains(points, c))
        .min_by_key(|&(id, points)| (points.len(), id))
        .map(|(id, _)| id)
}

/// Whether `points` matches a stored loop: same set, a subset of one, or the same size.
pub fn is_loop_already_known(board: &Board, points: &[Coord]) -> bool {
    let set = point_set(points);
    board
        .empty_loops()
        .iter()
        .chain(board.loops().iter())
        .any(|(_, stored)| {
            stored.len() == points.len() || set.is_subset(&point_set(stored))
        })
}
