//! Turn resolution.
//!
//! [`place_stone`] is one atomic turn: claim the cell, discover the loops the
//! new stone closes, resolve each of them, and, when the stone closed nothing,
//! promote the smallest claimed-empty loop it landed in.

use tracing::{debug, warn};

use crate::board::{Board, BoardError, Coord, PlayerId};
use crate::capture::{find_enclosing_empty_loop, resolve_loop, Resolution};
use crate::discovery::find_new_loops;
use crate::ownership::assign_owner;

/// What a single placement changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Whether the stone was actually placed. Occupied, captured and border
    /// cells are ignored without error.
    pub claimed: bool,
    /// Loops closed by the stone, in discovery order.
    pub resolutions: Vec<Resolution>,
    /// Claimed-empty loop re-resolved because the stone landed inside it.
    pub promotion: Option<Resolution>,
}

impl TurnOutcome {
    /// Total number of cells captured or claimed this turn.
    pub fn cells_affected(&self) -> usize {
        self.resolutions
            .iter()
            .chain(self.promotion.iter())
            .map(|r| r.interior)
            .sum()
    }
}

/// Play one stone of `owner` at `c`.
///
/// # Errors
/// - [`BoardError::UnknownPlayer`] if `owner` is not registered
/// - [`BoardError::OutOfBounds`] if `c` is outside the grid
///
/// Both are raised before the board is touched.
pub fn place_stone(board: &mut Board, c: Coord, owner: PlayerId) -> Result<TurnOutcome, BoardError> {
    let mut outcome = TurnOutcome {
        claimed: assign_owner(board, c, owner)?,
        ..TurnOutcome::default()
    };
    if !outcome.claimed {
        debug!(%c, owner, "placement ignored, cell not free");
        return Ok(outcome);
    }

    let loops = find_new_loops(board, c, owner);
    let closed_any = !loops.is_empty();
    for points in loops {
        if let Some(resolution) = resolve_loop(board, points, owner) {
            outcome.resolutions.push(resolution);
        }
    }

    if !closed_any {
        if let Some(id) = find_enclosing_empty_loop(board, c) {
            outcome.promotion = promote_empty_loop(board, id);
        }
    }

    debug!(
        %c,
        owner,
        loops = outcome.resolutions.len(),
        promoted = outcome.promotion.is_some(),
        "turn resolved"
    );
    Ok(outcome)
}

/// Take a claimed-empty loop out of its registry and resolve it again for the
/// player who drew it.
fn promote_empty_loop(board: &mut Board, id: u32) -> Option<Resolution> {
    let claimer = board
        .empty_loops()
        .get(id)
        .and_then(|points| points.first())
        .and_then(|&first| board.owner_at(first));
    let Some(claimer) = claimer else {
        warn!(id, "claimed-empty loop has no owned boundary, leaving it in place");
        return None;
    };

    let points = board.empty_loops_mut().remove(id)?;
    debug!(id, claimer, "re-resolving claimed-empty loop");
    resolve_loop(board, points, claimer)
}
