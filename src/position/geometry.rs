//! Process-wide attack tables for the non-sliding pieces (knight,
//! king, pawn), each indexed by origin square. Sliding-piece attacks
//! are never tabulated -- they are walked ray by ray at generation
//! time (see `bitsets::ray_attacks`), exactly as the generator is
//! specified to work.

use crate::basetypes::*;
use lazy_static::lazy_static;

fn knight_attacks_from(sq: Square) -> u64 {
    const OFFSETS: [(i32, i32); 8] = [
        (1, 2), (2, 1), (2, -1), (1, -2),
        (-1, -2), (-2, -1), (-2, 1), (-1, 2),
    ];
    attacks_from_offsets(sq, &OFFSETS)
}

fn king_attacks_from(sq: Square) -> u64 {
    const OFFSETS: [(i32, i32); 8] = [
        (1, 0), (1, 1), (0, 1), (-1, 1),
        (-1, 0), (-1, -1), (0, -1), (1, -1),
    ];
    attacks_from_offsets(sq, &OFFSETS)
}

fn pawn_attacks_from(sq: Square, side: Color) -> u64 {
    let dr: i32 = if side == WHITE { 1 } else { -1 };
    attacks_from_offsets(sq, &[(1, dr), (-1, dr)])
}

fn attacks_from_offsets(sq: Square, offsets: &[(i32, i32)]) -> u64 {
    let f = file(sq) as i32;
    let r = rank(sq) as i32;
    let mut bb = 0u64;
    for &(df, dr) in offsets {
        let nf = f + df;
        let nr = r + dr;
        if (0..8).contains(&nf) && (0..8).contains(&nr) {
            bb |= 1u64 << square(nf as File, nr as Rank);
        }
    }
    bb
}

pub struct Geometry {
    pub knight: [u64; 64],
    pub king: [u64; 64],
    /// `pawn_attacks[color][square]`
    pub pawn_attacks: [[u64; 64]; 2],
}

impl Geometry {
    fn new() -> Geometry {
        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn_attacks = [[0u64; 64]; 2];
        for sq in 0..64 {
            knight[sq] = knight_attacks_from(sq);
            king[sq] = king_attacks_from(sq);
            pawn_attacks[WHITE][sq] = pawn_attacks_from(sq, WHITE);
            pawn_attacks[BLACK][sq] = pawn_attacks_from(sq, BLACK);
        }
        Geometry { knight, king, pawn_attacks }
    }
}

lazy_static! {
    pub static ref GEOMETRY: Geometry = Geometry::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitsets::pop_count;

    #[test]
    fn knight_in_corner_has_two_targets() {
        assert_eq!(pop_count(GEOMETRY.knight[A1]), 2);
    }

    #[test]
    fn knight_in_center_has_eight_targets() {
        assert_eq!(pop_count(GEOMETRY.knight[square(FILE_D, RANK_4)]), 8);
    }

    #[test]
    fn king_in_center_has_eight_targets() {
        assert_eq!(pop_count(GEOMETRY.king[square(FILE_D, RANK_4)]), 8);
    }

    const A1: Square = 0;
}
