//! The static evaluator: a pure function of `Position` returning a
//! score from the side-to-move's perspective.

pub mod pst;

use crate::basetypes::*;
use crate::bitsets::pop_count;
use crate::position::Position;

pub const CAPTURE_BONUS: i32 = 75;
pub const CASTLE_BONUS: i32 = 100;

pub const TEMPO: i32 = 7;
pub const MOBILITY_FACTOR: i32 = 4;
/// Not recoverable from the retained source snapshot; chosen as the
/// smallest value consistent with `MOBILITY_FACTOR`'s magnitude (see
/// DESIGN.md).
pub const SCOPE_FACTOR: i32 = 2;
pub const KING_SAFETY_FACTOR: i32 = 3;
pub const PST_FACTOR: i32 = 1;

pub const KING_STRENGTH_VALUE: i32 = 430;
/// Base mate score; `MATE(n) = KING_VALUE - n` so that shorter mates
/// score higher.
pub const KING_VALUE: i32 = 50_000;

/// Ply count past which a side is considered to be in the endgame for
/// the purposes of null-move eligibility (the evaluator's own
/// material-based phase blend is the authority for PST/king-safety
/// blending; this is the search's coarser proxy).
pub const ENDGAME_CUTOFF: u32 = 60;

pub const PAWN_VALUE_MG: i32 = 100;
pub const PAWN_VALUE_EG: i32 = 120;
pub const KNIGHT_VALUE_MG: i32 = 320;
pub const KNIGHT_VALUE_EG: i32 = 300;
pub const BISHOP_VALUE_MG: i32 = 330;
pub const BISHOP_VALUE_EG: i32 = 320;
pub const ROOK_VALUE_MG: i32 = 500;
pub const ROOK_VALUE_EG: i32 = 520;
pub const QUEEN_VALUE_MG: i32 = 900;
pub const QUEEN_VALUE_EG: i32 = 940;

pub fn piece_value_mg(piece: PieceType) -> i32 {
    match piece {
        PAWN => PAWN_VALUE_MG,
        KNIGHT => KNIGHT_VALUE_MG,
        BISHOP => BISHOP_VALUE_MG,
        ROOK => ROOK_VALUE_MG,
        QUEEN => QUEEN_VALUE_MG,
        KING => KING_STRENGTH_VALUE,
        _ => 0,
    }
}

pub fn piece_value_eg(piece: PieceType) -> i32 {
    match piece {
        PAWN => PAWN_VALUE_EG,
        KNIGHT => KNIGHT_VALUE_EG,
        BISHOP => BISHOP_VALUE_EG,
        ROOK => ROOK_VALUE_EG,
        QUEEN => QUEEN_VALUE_EG,
        KING => KING_STRENGTH_VALUE,
        _ => 0,
    }
}

fn piece_value_blended(piece: PieceType, phase: f64) -> i32 {
    let mg = piece_value_mg(piece) as f64;
    let eg = piece_value_eg(piece) as f64;
    (mg * (1.0 - phase) + eg * phase) as i32
}

/// The piece-square-table delta for `piece` of `color` standing on
/// `square`, blended between middle-game and end-game by `phase`
/// (0 = pure middle-game, 1 = pure end-game) and scaled by
/// `PST_FACTOR`.
pub fn blended_pst(piece: PieceType, color: Color, square: Square, phase: f64) -> i32 {
    let sq = if color == BLACK { mirror(square) } else { square };
    let (mg, eg) = pst::lookup(piece, sq);
    let blended = mg as f64 * (1.0 - phase) + eg as f64 * phase;
    (blended * PST_FACTOR as f64) as i32
}

/// The game-phase blend factor: 0 at the start of the game, 1 once
/// the opponent's non-pawn material has dropped to the end-game
/// cutoff or below.
pub fn phase(position: &Position) -> f64 {
    let opponent = opposite(position.to_move());
    let material: i32 = [QUEEN, ROOK, BISHOP, KNIGHT]
        .iter()
        .map(|&piece| pop_count(position.pieces_of(opponent, piece)) as i32 * piece_value_mg(piece))
        .sum();
    let cutoff = QUEEN_VALUE_MG - PAWN_VALUE_MG;
    let max_material = QUEEN_VALUE_MG + 2 * KNIGHT_VALUE_MG + 2 * BISHOP_VALUE_MG + 2 * ROOK_VALUE_MG;
    let m = material.min(max_material);
    if m <= cutoff {
        1.0
    } else {
        (1.0 - (m - cutoff) as f64 / (max_material - cutoff) as f64).clamp(0.0, 1.0)
    }
}

fn material_score(position: &Position, side: Color, phase: f64) -> i32 {
    [QUEEN, ROOK, BISHOP, KNIGHT, PAWN]
        .iter()
        .map(|&piece| pop_count(position.pieces_of(side, piece)) as i32 * piece_value_blended(piece, phase))
        .sum()
}

fn pst_score(position: &Position, side: Color, phase: f64) -> i32 {
    let mut score = 0;
    for piece in PIECE_TYPES {
        let mut bb = position.pieces_of(side, piece);
        while bb != 0 {
            let sq = bb.trailing_zeros() as Square;
            score += blended_pst(piece, side, sq, phase);
            bb &= bb - 1;
        }
    }
    score
}

/// Counts empty-square ray steps from `side`'s king in all eight
/// directions -- a cheap proxy for how exposed the king is.
fn king_exposure(position: &Position, side: Color) -> i32 {
    use crate::bitsets::*;
    let king_sq = position.king_square(side);
    let origin = 1u64 << king_sq;
    let occupied = position.occupied();
    let mut rays = 0u64;
    for dir in [north, south, east, west, north_east, north_west, south_east, south_west] {
        rays |= ray_attacks(origin, dir, 0, occupied) & !occupied;
    }
    pop_count(rays) as i32
}

/// Computes the static score of `position` from the side-to-move's
/// perspective.
pub fn evaluate(position: &Position) -> i32 {
    let side = position.to_move();
    let other = opposite(side);
    let phase = phase(position);

    let material = material_score(position, side, phase) - material_score(position, other, phase);
    let tempo = TEMPO;
    let mobility = MOBILITY_FACTOR
        * (pop_count(position.mobility_of(side)) as i32 - pop_count(position.mobility_of(other)) as i32)
        + SCOPE_FACTOR * (position.scope_of(side) as i32 - position.scope_of(other) as i32);
    let pst = pst_score(position, side, phase) - pst_score(position, other, phase);
    let king_safety = -KING_SAFETY_FACTOR
        * (((king_exposure(position, side)) as f64 * (1.0 - phase)) as i32);

    material + tempo + mobility + pst + king_safety
}

/// The score reported for a forced mate in `n` plies from the
/// side-to-move's perspective (positive: side to move mates).
pub fn mate_score(n: i32) -> i32 {
    KING_VALUE - n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        let pos = Position::start();
        // Only the tempo bonus should separate the two sides at move 1.
        assert_eq!(evaluate(&pos), TEMPO);
    }

    #[test]
    fn phase_is_zero_with_full_material() {
        let pos = Position::start();
        assert_eq!(phase(&pos), 0.0);
    }

    #[test]
    fn phase_is_one_with_bare_kings() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(phase(&pos), 1.0);
    }
}
