//! Piece-square tables, one middle-game and one end-game table per
//! piece type, indexed by square from white's point of view (black's
//! own square is mirrored vertically before lookup -- see
//! `basetypes::mirror`).

use crate::basetypes::*;
use lazy_static::lazy_static;

/// Builds a 64-entry table from an 8x8 grid written rank 8 first
/// (the order a human reads a board diagram in), converting it to
/// `square()` order (rank 1 first).
fn from_ranks_8_to_1(rows: [[i32; 8]; 8]) -> [i32; 64] {
    let mut table = [0i32; 64];
    for (i, row) in rows.iter().enumerate() {
        let r = 7 - i;
        for (f, &value) in row.iter().enumerate() {
            table[square(f, r)] = value;
        }
    }
    table
}

lazy_static! {
    static ref PAWN_MG: [i32; 64] = from_ranks_8_to_1([
        [  0,   0,   0,   0,   0,   0,   0,   0],
        [ 50,  50,  50,  50,  50,  50,  50,  50],
        [ 10,  10,  20,  30,  30,  20,  10,  10],
        [  5,   5,  10,  25,  25,  10,   5,   5],
        [  0,   0,   0,  20,  20,   0,   0,   0],
        [  5,  -5, -10,   0,   0, -10,  -5,   5],
        [  5,  10,  10, -20, -20,  10,  10,   5],
        [  0,   0,   0,   0,   0,   0,   0,   0],
    ]);
    static ref PAWN_EG: [i32; 64] = from_ranks_8_to_1([
        [  0,   0,   0,   0,   0,   0,   0,   0],
        [ 80,  80,  80,  80,  80,  80,  80,  80],
        [ 50,  50,  50,  50,  50,  50,  50,  50],
        [ 20,  20,  20,  20,  20,  20,  20,  20],
        [ 10,  10,  10,  10,  10,  10,  10,  10],
        [  5,   5,   5,   5,   5,   5,   5,   5],
        [  0,   0,   0,   0,   0,   0,   0,   0],
        [  0,   0,   0,   0,   0,   0,   0,   0],
    ]);
    static ref KNIGHT_TABLE: [i32; 64] = from_ranks_8_to_1([
        [-50, -40, -30, -30, -30, -30, -40, -50],
        [-40, -20,   0,   0,   0,   0, -20, -40],
        [-30,   0,  10,  15,  15,  10,   0, -30],
        [-30,   5,  15,  20,  20,  15,   5, -30],
        [-30,   0,  15,  20,  20,  15,   0, -30],
        [-30,   5,  10,  15,  15,  10,   5, -30],
        [-40, -20,   0,   5,   5,   0, -20, -40],
        [-50, -40, -30, -30, -30, -30, -40, -50],
    ]);
    static ref BISHOP_TABLE: [i32; 64] = from_ranks_8_to_1([
        [-20, -10, -10, -10, -10, -10, -10, -20],
        [-10,   0,   0,   0,   0,   0,   0, -10],
        [-10,   0,   5,  10,  10,   5,   0, -10],
        [-10,   5,   5,  10,  10,   5,   5, -10],
        [-10,   0,  10,  10,  10,  10,   0, -10],
        [-10,  10,  10,  10,  10,  10,  10, -10],
        [-10,   5,   0,   0,   0,   0,   5, -10],
        [-20, -10, -10, -10, -10, -10, -10, -20],
    ]);
    static ref ROOK_TABLE: [i32; 64] = from_ranks_8_to_1([
        [  0,   0,   0,   0,   0,   0,   0,   0],
        [  5,  10,  10,  10,  10,  10,  10,   5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [  0,   0,   0,   5,   5,   0,   0,   0],
    ]);
    static ref QUEEN_TABLE: [i32; 64] = from_ranks_8_to_1([
        [-20, -10, -10,  -5,  -5, -10, -10, -20],
        [-10,   0,   0,   0,   0,   0,   0, -10],
        [-10,   0,   5,   5,   5,   5,   0, -10],
        [ -5,   0,   5,   5,   5,   5,   0,  -5],
        [  0,   0,   5,   5,   5,   5,   0,  -5],
        [-10,   5,   5,   5,   5,   5,   0, -10],
        [-10,   0,   5,   0,   0,   0,   0, -10],
        [-20, -10, -10,  -5,  -5, -10, -10, -20],
    ]);
    static ref KING_MG: [i32; 64] = from_ranks_8_to_1([
        [-30, -40, -40, -50, -50, -40, -40, -30],
        [-30, -40, -40, -50, -50, -40, -40, -30],
        [-30, -40, -40, -50, -50, -40, -40, -30],
        [-30, -40, -40, -50, -50, -40, -40, -30],
        [-20, -30, -30, -40, -40, -30, -30, -20],
        [-10, -20, -20, -20, -20, -20, -20, -10],
        [ 20,  20,   0,   0,   0,   0,  20,  20],
        [ 20,  30,  10,   0,   0,  10,  30,  20],
    ]);
    static ref KING_EG: [i32; 64] = from_ranks_8_to_1([
        [-50, -40, -30, -20, -20, -30, -40, -50],
        [-30, -20, -10,   0,   0, -10, -20, -30],
        [-30, -10,  20,  30,  30,  20, -10, -30],
        [-30, -10,  30,  40,  40,  30, -10, -30],
        [-30, -10,  30,  40,  40,  30, -10, -30],
        [-30, -10,  20,  30,  30,  20, -10, -30],
        [-30, -30,   0,   0,   0,   0, -30, -30],
        [-50, -30, -30, -30, -30, -30, -30, -50],
    ]);
}

/// Returns `(mg, eg)` for `piece` at `square` (white's point of view;
/// callers mirror black's square before calling).
pub fn lookup(piece: PieceType, square: Square) -> (i32, i32) {
    match piece {
        PAWN => (PAWN_MG[square], PAWN_EG[square]),
        KNIGHT => (KNIGHT_TABLE[square], KNIGHT_TABLE[square]),
        BISHOP => (BISHOP_TABLE[square], BISHOP_TABLE[square]),
        ROOK => (ROOK_TABLE[square], ROOK_TABLE[square]),
        QUEEN => (QUEEN_TABLE[square], QUEEN_TABLE[square]),
        KING => (KING_MG[square], KING_EG[square]),
        _ => (0, 0),
    }
}
