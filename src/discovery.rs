//! Loop discovery.
//!
//! Starting from a freshly placed stone, a backtracking depth-first search
//! walks every simple path of same-owner, never-captured stones connected by
//! king moves. Whenever the current path closes back onto one of its earlier
//! coordinates, the closed part is offered as a candidate loop.
//!
//! Candidates are deduplicated against the loops already stored on the board
//! and against the candidates collected earlier in the same search, so one
//! stone yields each enclosing cycle at most once.

use std::collections::HashSet;

use tracing::trace;

use crate::board::{Board, Cell, Coord, PlayerId};
use crate::constants::{MIN_LOOP_AREA, MIN_LOOP_LEN};
use crate::geometry::signed_area;
use crate::registry::point_set;

/// A cell may extend a path of `owner` when it is an uncaptured stone of `owner`.
pub fn is_eligible(board: &Board, c: Coord, owner: PlayerId) -> bool {
    matches!(
        board.get(c),
        Some(Cell::Open(dot)) if dot.owner == Some(owner) && !dot.is_captured()
    )
}

/// Eligible king-move neighbours of `c`, in row-major order.
pub fn eligible_neighbours(board: &Board, c: Coord, owner: PlayerId) -> Vec<Coord> {
    c.neighbours()
        .filter(|&n| is_eligible(board, n, owner))
        .collect()
}

/// Index of the first path coordinate that closes a loop with the last one.
///
/// Only indices up to `len - 4` are considered, so a loop has at least four
/// coordinates. `None` for paths shorter than that.
pub fn closing_index(path: &[Coord]) -> Option<usize> {
    if path.len() < MIN_LOOP_LEN {
        return None;
    }
    let last = *path.last()?;
    (0..=path.len() - MIN_LOOP_LEN).find(|&i| path[i].is_neighbour(last))
}

/// Find the new loops of `owner` passing through the component around `start`.
///
/// Returns candidate loops in discovery order. The same board state always
/// yields the same list.
pub fn find_new_loops(board: &Board, start: Coord, owner: PlayerId) -> Vec<Vec<Coord>> {
    if eligible_neighbours(board, start, owner).len() < 2 {
        trace!(%start, owner, "fewer than two eligible neighbours, no loop possible");
        return Vec::new();
    }

    let mut known = board.loops().point_sets();
    known.extend(board.empty_loops().point_sets());

    let mut search = LoopSearch {
        board,
        owner,
        known,
        path: Vec::new(),
        found: Vec::new(),
    };
    search.visit(start);

    trace!(%start, owner, loops = search.found.len(), "loop search finished");
    search.found.into_iter().map(|c| c.points).collect()
}

struct Candidate {
    points: Vec<Coord>,
    set: HashSet<Coord>,
}

struct LoopSearch<'a> {
    board: &'a Board,
    owner: PlayerId,
    /// Point sets of both registries at search start.
    known: Vec<HashSet<Coord>>,
    path: Vec<Coord>,
    found: Vec<Candidate>,
}

impl LoopSearch<'_> {
    fn visit(&mut self, c: Coord) {
        let next: Vec<Coord> = eligible_neighbours(self.board, c, self.owner)
            .into_iter()
            .filter(|n| !self.path.contains(n))
            .collect();

        self.path.push(c);
        if self.path.len() >= MIN_LOOP_LEN && signed_area(&self.path).abs() > MIN_LOOP_AREA {
            if let Some(i) = closing_index(&self.path) {
                let points = self.path[i..].to_vec();
                self.offer(points);
            }
        }

        for n in next {
            self.visit(n);
        }
        self.path.pop();
    }

    fn offer(&mut self, points: Vec<Coord>) {
        let set = point_set(&points);

        // Same stones as a stored loop, or a detour around one.
        if self
            .known
            .iter()
            .any(|k| set.is_subset(k) || k.is_subset(&set))
        {
            trace!(len = points.len(), "candidate overlaps a stored loop");
            return;
        }

        if self.found.iter().any(|f| set.is_subset(&f.set)) {
            return;
        }

        let candidate = Candidate { points, set };
        match self.found.iter().position(|f| f.set.is_subset(&candidate.set)) {
            Some(slot) => {
                self.found.retain(|f| !f.set.is_subset(&candidate.set));
                self.found.insert(slot, candidate);
            }
            None => self.found.push(candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::register_player;

    fn pts(raw: &[(usize, usize)]) -> Vec<Coord> {
        raw.iter().map(|&p| Coord::from(p)).collect()
    }

    fn board_with(stones: &[(usize, usize)], owner: PlayerId) -> Board {
        let mut board = Board::new(20, 20).unwrap();
        register_player(&mut board, owner).unwrap();
        register_player(&mut board, 10).unwrap();
        for &c in stones {
            board.dot_mut(Coord::from(c)).unwrap().owner = Some(owner);
        }
        board
    }

    fn as_set(points: &[Coord]) -> HashSet<Coord> {
        point_set(points)
    }

    #[test]
    fn test_closing_index() {
        let closed = pts(&[(1, 2), (2, 3), (3, 3), (4, 2), (3, 1), (2, 1)]);
        assert_eq!(closing_index(&closed), Some(0));

        let open = pts(&[(1, 2), (2, 3), (3, 3), (4, 2), (3, 1)]);
        assert_eq!(closing_index(&open), None);

        assert_eq!(closing_index(&[]), None);
    }

    #[test]
    fn test_fast_exit() {
        let board = board_with(&[(3, 3), (3, 4)], 1);
        assert!(find_new_loops(&board, Coord::new(3, 3), 1).is_empty());
    }

    #[test]
    fn test_two_by_two_block_is_degenerate() {
        let board = board_with(&[(3, 3), (3, 4), (4, 3), (4, 4)], 1);
        assert!(find_new_loops(&board, Coord::new(4, 4), 1).is_empty());
    }

    #[test]
    fn test_one_loop() {
        let board = board_with(
            &[(1, 2), (2, 2), (3, 3), (4, 3), (5, 2), (4, 1), (3, 1)],
            1,
        );
        let loops = find_new_loops(&board, Coord::new(3, 1), 1);
        assert_eq!(loops.len(), 1);
        assert_eq!(
            as_set(&loops[0]),
            as_set(&pts(&[(2, 2), (3, 3), (4, 3), (5, 2), (4, 1), (3, 1)]))
        );
    }

    #[test]
    fn test_known_loop_is_not_rediscovered() {
        let mut board = board_with(
            &[
                (2, 2), (3, 3), (4, 3), (2, 4),
                (5, 2), (4, 1), (3, 1), (1, 3),
            ],
            1,
        );
        let known = pts(&[(2, 2), (3, 3), (4, 3), (5, 2), (4, 1), (3, 1)]);
        board.empty_loops_mut().insert(1, known);

        let loops = find_new_loops(&board, Coord::new(2, 4), 1);
        assert_eq!(loops.len(), 1);
        assert_eq!(
            as_set(&loops[0]),
            as_set(&pts(&[(1, 3), (2, 4), (2, 2), (3, 3)]))
        );
    }

    #[test]
    fn test_eight_shape_loop() {
        let board = board_with(
            &[
                (1, 2), (1, 3), (1, 5),
                (2, 1), (2, 6),
                (3, 2), (3, 3), (3, 5),
            ],
            1,
        );
        let loops = find_new_loops(&board, Coord::new(2, 4), 1);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].len(), 6);
        assert_eq!(loops[1].len(), 4);
    }

    #[test]
    fn test_captured_stones_do_not_extend_paths() {
        let mut board = board_with(&[(2, 2), (3, 1), (3, 3), (4, 2)], 1);
        board.dot_mut(Coord::new(3, 3)).unwrap().captured.push(10);
        assert!(find_new_loops(&board, Coord::new(4, 2), 1).is_empty());
    }

    #[test]
    fn test_other_owner_is_ignored() {
        let board = board_with(&[(2, 2), (3, 1), (3, 3), (4, 2)], 1);
        assert!(find_new_loops(&board, Coord::new(4, 2), 10).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let board = board_with(
            &[
                (1, 2), (1, 3), (1, 5),
                (2, 1), (2, 4), (2, 6),
                (3, 2), (3, 3), (3, 5),
            ],
            1,
        );
        let first = find_new_loops(&board, Coord::new(2, 4), 1);
        let second = find_new_loops(&board, Coord::new(2, 4), 1);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
