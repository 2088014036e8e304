//! Longer game scenarios.
//!
//! Each test plays out a small game from an empty board, or from a stored
//! position, and checks the registries and score table afterwards.

use std::io::Cursor;

use dots_rules::board::{Board, Coord, PlayerId};
use dots_rules::capture::{recompute_score, LoopKind, Resolution};
use dots_rules::game::{place_stone, TurnOutcome};
use dots_rules::ownership::register_player;
use dots_rules::session::Session;
use dots_rules::snapshot::BoardSnapshot;

// =============================================================================
// Helper functions
// =============================================================================

fn new_game(height: usize, width: usize) -> Board {
    let mut board = Board::new(height, width).unwrap();
    register_player(&mut board, 1).unwrap();
    register_player(&mut board, 2).unwrap();
    board
}

/// Play stones in order and return the outcome of the last one.
fn play_all(board: &mut Board, owner: PlayerId, stones: &[(usize, usize)]) -> TurnOutcome {
    let mut last = TurnOutcome::default();
    for &c in stones {
        last = place_stone(board, Coord::from(c), owner).unwrap();
    }
    last
}

/// Perimeter of the square with corners (lo, lo) and (hi, hi), clockwise.
fn square_ring(lo: usize, hi: usize) -> Vec<(usize, usize)> {
    let mut ring = Vec::new();
    ring.extend((lo..=hi).map(|c| (lo, c)));
    ring.extend((lo + 1..=hi).map(|r| (r, hi)));
    ring.extend((lo..hi).rev().map(|c| (hi, c)));
    ring.extend((lo + 1..hi).rev().map(|r| (r, lo)));
    ring
}

// =============================================================================
// Multi-loop turn
// =============================================================================

#[test]
fn test_one_stone_closes_two_loops() {
    let mut board = new_game(7, 7);
    play_all(&mut board, 2, &[(2, 2), (2, 5)]);

    let setup = play_all(
        &mut board,
        1,
        &[(1, 2), (1, 3), (1, 5), (2, 1), (2, 6), (3, 2), (3, 3), (3, 5)],
    );
    assert!(setup.resolutions.is_empty());
    assert!(board.loops().is_empty());

    // The joint at (2, 4) closes the left and the right lobe at once.
    let outcome = play_all(&mut board, 1, &[(2, 4)]);
    assert_eq!(
        outcome.resolutions,
        vec![
            Resolution {
                id: 1,
                kind: LoopKind::Capturing,
                interior: 2
            },
            Resolution {
                id: 2,
                kind: LoopKind::Capturing,
                interior: 1
            },
        ]
    );
    assert_eq!(outcome.promotion, None);
    assert_eq!(outcome.cells_affected(), 3);

    assert_eq!(board.loops().len(), 2);
    assert_eq!(board.loops().get(1).unwrap().len(), 6);
    assert_eq!(board.loops().get(2).unwrap().len(), 4);

    // The free cell in the left lobe is captured too but scores nothing.
    assert_eq!(board.get(Coord::new(2, 3)).unwrap().captured(), &[1]);
    assert_eq!(board.score_of(1), Some(2));
    assert_eq!(board.score_of(2), Some(0));

    let outcome = place_stone(&mut board, Coord::new(2, 3), 2).unwrap();
    assert!(!outcome.claimed);
}

// =============================================================================
// Recapture
// =============================================================================

#[test]
fn test_outer_ring_recaptures() {
    let mut board = new_game(7, 7);
    play_all(&mut board, 2, &[(4, 4)]);
    let outcome = play_all(&mut board, 1, &[(3, 4), (4, 3), (4, 5), (5, 4)]);
    assert_eq!(outcome.resolutions.len(), 1);
    assert_eq!(board.score_of(1), Some(1));

    // Player 2 walls in the whole diamond.
    let outcome = play_all(&mut board, 2, &square_ring(2, 6));
    assert_eq!(
        outcome.resolutions,
        vec![Resolution {
            id: 2,
            kind: LoopKind::Capturing,
            interior: 9
        }]
    );

    // Player 2 keeps the center stone and takes the diamond.
    assert_eq!(board.get(Coord::new(4, 4)).unwrap().captured(), &[1, 2]);
    for c in [(3, 4), (4, 3), (4, 5), (5, 4)] {
        assert_eq!(board.get(Coord::from(c)).unwrap().captured(), &[2]);
    }
    assert_eq!(board.score_of(1), Some(0));
    assert_eq!(board.score_of(2), Some(4));
    assert_eq!(board.loops().len(), 2);
}

#[test]
fn test_recapture_by_own_player_scores_nothing() {
    let board = new_game(5, 5);
    let mut snapshot = BoardSnapshot::from(&board);
    snapshot.field[3][2].owner = Some(1);
    snapshot.field[3][2].captured = Some(vec![2, 1]);
    snapshot.field[3][3].owner = Some(2);
    snapshot.field[3][3].captured = Some(vec![1, 2, 1]);
    snapshot.field[2][2].owner = Some(2);
    snapshot.field[2][2].captured = Some(vec![1, 2]);

    let mut board = Board::try_from(snapshot).unwrap();
    recompute_score(&mut board);
    assert_eq!(board.score_of(1), Some(1));
    assert_eq!(board.score_of(2), Some(0));
}

// =============================================================================
// Claims
// =============================================================================

#[test]
fn test_smallest_claim_is_promoted() {
    let mut board = Board::new(9, 9).unwrap();
    register_player(&mut board, 1).unwrap();
    register_player(&mut board, 2).unwrap();

    // An outer square claim and a small diamond claim inside it.
    let outer = play_all(&mut board, 1, &square_ring(1, 9));
    assert_eq!(outer.resolutions[0].kind, LoopKind::Empty);
    let inner = play_all(&mut board, 1, &[(4, 5), (5, 4), (5, 6), (6, 5)]);
    assert_eq!(inner.resolutions[0].kind, LoopKind::Empty);
    assert_eq!(board.empty_loops().len(), 2);

    let outcome = place_stone(&mut board, Coord::new(5, 5), 2).unwrap();
    let promotion = outcome.promotion.unwrap();
    assert_eq!(promotion.kind, LoopKind::Capturing);
    assert_eq!(promotion.interior, 1);

    // The outer claim stays, the diamond moved to the captured registry.
    assert_eq!(board.empty_loops().len(), 1);
    assert_eq!(board.empty_loops().get(1).unwrap().len(), 32);
    assert_eq!(board.loops().len(), 1);
    assert_eq!(board.score_of(1), Some(1));
}

// =============================================================================
// Session protocol
// =============================================================================

#[test]
fn test_session_transcript() {
    let script = "\
1 newgame 5 5
2 addplayer 1
3 addplayer 2
# player 2 goes first
play 2 3 2
play 1 2 2
play 1 3 1
play 1 3 3
4 play 1 4 2
5 score
6 isfull
bogus
7 quit
play 1 1 1
";
    let mut session = Session::new(10, 10).unwrap();
    let mut output = Vec::new();
    session.run_with(Cursor::new(script), &mut output).unwrap();

    let expected = "\
=1 \n\n=2 \n\n=3 \n\n= \n\n= \n\n= \n\n= \n\n\
=4 capture:1\n\n=5 1:1 2:0\n\n=6 false\n\n\
? unknown command: bogus\n\n=7 \n\n";
    assert_eq!(String::from_utf8(output).unwrap(), expected);

    // Nothing after quit is played.
    assert_eq!(session.board().owner_at(Coord::new(1, 1)), None);
}

#[test]
fn test_session_restore_roundtrip() {
    let mut board = new_game(5, 5);
    play_all(&mut board, 1, &[(2, 2), (3, 1), (3, 3), (4, 2)]);
    let json = dots_rules::snapshot::to_json(&board).unwrap();

    let script = format!("restore {json}\nplay 2 3 2\nloops\n");
    let mut session = Session::new(5, 5).unwrap();
    let mut output = Vec::new();
    session.run_with(Cursor::new(script), &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("= promote:1\n"), "{text}");
    assert!(text.contains("= captured 1: "), "{text}");
    assert_eq!(session.board().score_of(1), Some(1));
}
