//! Integration-level invariant and round-trip checks from the
//! specification's testable properties, run over a realistic sequence
//! of plies rather than a single hand-picked position.

use sohilbot::chess_move::parse_uci_move;
use sohilbot::position::Position;

const ITALIAN_GAME: &[&str] = &[
    "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1", "g8f6",
];

#[test]
fn hash_and_occupancy_invariants_hold_along_a_game() {
    let mut pos = Position::start();
    for mv_text in ITALIAN_GAME {
        let (from, to, promotion) = parse_uci_move(mv_text).unwrap();
        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        let mv = *moves
            .iter()
            .find(|m| m.same_move(from, to, promotion))
            .unwrap_or_else(|| panic!("{} not found among legal moves", mv_text));
        pos.apply(mv);

        assert_eq!(pos.hash(), pos.recompute_hash(), "hash invariant broken after {}", mv_text);
        assert_eq!(
            pos.occupied_by(sohilbot::basetypes::WHITE) & pos.occupied_by(sohilbot::basetypes::BLACK),
            0,
            "white/black occupancy overlap after {}",
            mv_text
        );
    }
    // White has castled king-side: the rook must have moved to f1.
    let (_, rook_type) = pos
        .piece_at(sohilbot::chess_move::parse_square("f1").unwrap())
        .expect("no piece on f1 after castling");
    assert_eq!(rook_type, sohilbot::basetypes::ROOK);
}

#[test]
fn clone_and_apply_leaves_the_original_untouched() {
    let pos = Position::start();
    let mut moves = Vec::new();
    pos.generate(&mut moves, false);
    let mv = moves[0];
    let original_hash = pos.hash();
    let child = pos.clone_and_apply(mv);
    assert_eq!(pos.hash(), original_hash);
    assert_ne!(child.hash(), original_hash);
}

#[test]
fn in_check_detects_rook_check_through_open_file() {
    let pos = Position::from_fen("4r3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(pos.in_check(sohilbot::basetypes::WHITE));
}

#[test]
fn in_check_is_false_when_blocked() {
    let pos = Position::from_fen("4r3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
    assert!(!pos.in_check(sohilbot::basetypes::WHITE));
}

#[test]
fn en_passant_target_is_set_only_right_after_the_double_push() {
    let mut pos = Position::from_fen(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    )
    .unwrap();
    assert_eq!(pos.ep_square(), None);
    let (from, to, promotion) = parse_uci_move("e2e4").unwrap();
    let mut moves = Vec::new();
    pos.generate(&mut moves, false);
    let mv = *moves.iter().find(|m| m.same_move(from, to, promotion)).unwrap();
    pos.apply(mv);
    assert!(pos.ep_square().is_some());

    // A reply that is not a second double pawn push clears it again.
    let (from, to, promotion) = parse_uci_move("g8f6").unwrap();
    let mut moves = Vec::new();
    pos.generate(&mut moves, false);
    let mv = *moves.iter().find(|m| m.same_move(from, to, promotion)).unwrap();
    pos.apply(mv);
    assert_eq!(pos.ep_square(), None);
}
