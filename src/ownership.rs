//! Player registration and stone ownership.

use crate::board::{Board, BoardError, Cell, Coord, PlayerId};

/// Register a player. Registering the same id again changes nothing.
///
/// The player's score entry is created at 0 if it does not exist yet.
pub fn register_player(board: &mut Board, id: PlayerId) -> Result<(), BoardError> {
    if !board.has_player(id) {
        board.players_mut().push(id);
    }
    init_score(board, id)
}

/// Create the score entry for a registered player.
///
/// # Errors
/// [`BoardError::UnknownPlayer`] if `id` is not in the player list.
pub fn init_score(board: &mut Board, id: PlayerId) -> Result<(), BoardError> {
    if !board.has_player(id) {
        return Err(BoardError::UnknownPlayer(id));
    }
    board.score_mut().entry(id).or_insert(0);
    Ok(())
}

/// Claim the cell at `c` for `id` if it is free.
///
/// Returns `Ok(true)` when the cell was claimed. Border cells, owned cells and
/// cells with capture history are left alone and yield `Ok(false)`.
///
/// # Errors
/// - [`BoardError::UnknownPlayer`] if `id` is not registered
/// - [`BoardError::OutOfBounds`] if `c` is outside the grid
pub fn assign_owner(board: &mut Board, c: Coord, id: PlayerId) -> Result<bool, BoardError> {
    if !board.has_player(id) {
        return Err(BoardError::UnknownPlayer(id));
    }

    match board.cell_mut(c)? {
        Cell::Open(dot) if dot.owner.is_none() && dot.captured.is_empty() => {
            dot.owner = Some(id);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// True when every playable cell is owned or has been captured.
pub fn is_board_full(board: &Board) -> bool {
    board.interior_coords().all(|c| {
        board
            .get(c)
            .and_then(Cell::dot)
            .is_some_and(|dot| dot.owner.is_some() || dot.is_captured())
    })
}
