//! End-to-end perft scenarios from the specification's testable
//! properties. Full depths (millions of nodes) are `#[ignore]`d so
//! `cargo test` stays fast; a shallower depth of each scenario runs by
//! default so the positions and move generator stay exercised on
//! every run.

use sohilbot::position::Position;
use sohilbot::search::perft::perft;

#[test]
fn startpos_shallow() {
    let pos = Position::start();
    let counts = perft(&pos, 3);
    assert_eq!(counts.nodes, 8_902);
}

#[test]
#[ignore] // ~5M nodes; run with `cargo test -- --ignored --release`
fn startpos_depth_5_matches_canonical_counts() {
    let pos = Position::start();
    let counts = perft(&pos, 5);
    assert_eq!(counts.nodes, 4_865_609);
    assert_eq!(counts.captures, 82_719);
    assert_eq!(counts.en_passants, 258);
    assert_eq!(counts.castles, 0);
    assert_eq!(counts.promotions, 0);
    assert_eq!(counts.checks, 27_351);
    assert_eq!(counts.mates, 8);
}

const KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

#[test]
fn kiwipete_shallow() {
    let pos = Position::from_fen(KIWIPETE).unwrap();
    let counts = perft(&pos, 2);
    assert_eq!(counts.nodes, 2_039);
}

#[test]
#[ignore] // ~4M nodes
fn kiwipete_depth_4_matches_canonical_counts() {
    let pos = Position::from_fen(KIWIPETE).unwrap();
    let counts = perft(&pos, 4);
    assert_eq!(counts.nodes, 4_085_603);
    assert_eq!(counts.captures, 757_163);
    assert_eq!(counts.en_passants, 1_929);
    assert_eq!(counts.castles, 128_013);
    assert_eq!(counts.promotions, 15_172);
    assert_eq!(counts.checks, 25_523);
    assert_eq!(counts.mates, 1);
}

const ENDGAME_POSITION: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";

#[test]
fn endgame_position_shallow() {
    let pos = Position::from_fen(ENDGAME_POSITION).unwrap();
    let counts = perft(&pos, 2);
    assert_eq!(counts.nodes, 191);
}

#[test]
#[ignore] // ~11M nodes
fn endgame_position_depth_6_matches_canonical_counts() {
    let pos = Position::from_fen(ENDGAME_POSITION).unwrap();
    let counts = perft(&pos, 6);
    assert_eq!(counts.nodes, 11_030_083);
    assert_eq!(counts.captures, 940_350);
    assert_eq!(counts.en_passants, 33_325);
    assert_eq!(counts.castles, 0);
    assert_eq!(counts.promotions, 7_552);
    assert_eq!(counts.checks, 452_473);
    assert_eq!(counts.mates, 0);
}

const PROMOTION_POSITION: &str =
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -";

#[test]
fn promotion_position_shallow() {
    let pos = Position::from_fen(PROMOTION_POSITION).unwrap();
    let counts = perft(&pos, 3);
    assert_eq!(counts.nodes, 9_467);
}

#[test]
#[ignore] // ~16M nodes
fn promotion_position_depth_5_matches_canonical_counts() {
    let pos = Position::from_fen(PROMOTION_POSITION).unwrap();
    let counts = perft(&pos, 5);
    assert_eq!(counts.nodes, 15_833_292);
    assert_eq!(counts.captures, 2_046_173);
    assert_eq!(counts.en_passants, 6_512);
    assert_eq!(counts.castles, 0);
    assert_eq!(counts.promotions, 329_464);
    assert_eq!(counts.checks, 200_568);
    assert_eq!(counts.mates, 5);
}
