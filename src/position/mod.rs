//! The `Position` type: bitboard encoding, pseudo-legal move
//! generation, `apply`, `in_check`, and the Zobrist hash invariant.

pub mod geometry;

use crate::basetypes::*;
use crate::bitsets::*;
use crate::chess_move::Move;
use crate::error::FenError;
use crate::eval;
use crate::zobrist::{self, ZOBRIST};
use geometry::GEOMETRY;

/// Home squares for the rooks and kings that castling rights depend
/// on.
const WHITE_KING_HOME: Square = 4; // e1
const WHITE_ROOK_SHORT_HOME: Square = 7; // h1
const WHITE_ROOK_LONG_HOME: Square = 0; // a1
const BLACK_KING_HOME: Square = 60; // e8
const BLACK_ROOK_SHORT_HOME: Square = 63; // h8
const BLACK_ROOK_LONG_HOME: Square = 56; // a8

/// Length of the recent-position-hash ring used for repetition
/// detection. Wraps modulo 4, per the specification.
pub const REPETITION_RING_LEN: usize = 4;

#[derive(Clone)]
pub struct Position {
    /// `pieces[color][piece_type]`, indexed by `KING..=PAWN`.
    pieces: [[u64; 6]; 2],
    occupied: [u64; 2],
    to_move: Color,
    /// Indexed by `zobrist::{WHITE_SHORT, WHITE_LONG, BLACK_SHORT, BLACK_LONG}`.
    castling: [bool; 4],
    ep_square: Option<Square>,
    /// Number of plies played so far this game (from the position's
    /// point of creation). Used by the evaluator's phase blend and by
    /// the search's null-move eligibility test.
    ply: u32,
    hash: u64,
    /// Cached union of squares each side attacks -- recomputed after
    /// every `apply`.
    mobility: [u64; 2],
    /// Cached weighted move count per side (sliding pieces count each
    /// ray step; used by the evaluator's scope term).
    scope: [u32; 2],
    rep_ring: [u64; REPETITION_RING_LEN],
    rep_idx: usize,
    /// Whether this position's hash matched an ancestor still held in
    /// `rep_ring` *before* this position's own hash was pushed into
    /// it. Computed once by `apply`/`make_null_move` rather than by
    /// `is_recent_repetition` itself, since by the time a caller can
    /// observe a `Position` its own hash is already part of the ring.
    repeated: bool,
}

impl Position {
    pub fn start() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    pub fn occupied(&self) -> u64 {
        self.occupied[WHITE] | self.occupied[BLACK]
    }

    pub fn occupied_by(&self, side: Color) -> u64 {
        self.occupied[side]
    }

    pub fn pieces_of(&self, side: Color, piece: PieceType) -> u64 {
        self.pieces[side][piece]
    }

    pub fn mobility_of(&self, side: Color) -> u64 {
        self.mobility[side]
    }

    pub fn scope_of(&self, side: Color) -> u32 {
        self.scope[side]
    }

    pub fn has_castling_right(&self, idx: usize) -> bool {
        self.castling[idx]
    }

    /// The current recent-history ring, for repetition comparisons
    /// made outside the search (e.g. by the UCI collaborator replaying
    /// played moves).
    pub fn repetition_ring(&self) -> &[u64; REPETITION_RING_LEN] {
        &self.rep_ring
    }

    pub fn king_square(&self, side: Color) -> Square {
        bitscan_forward(self.pieces[side][KING])
    }

    /// Clones the position and applies `mv` to the clone, per the
    /// "unmake by copy-restore" discipline: the caller just lets the
    /// clone go out of scope instead of explicitly undoing.
    pub fn clone_and_apply(&self, mv: Move) -> Position {
        let mut child = self.clone();
        child.apply(mv);
        child
    }

    /// Produces the position reached by passing the move (flipping
    /// the side to move without moving a piece), used by the search's
    /// null-move reduction. Clears any en-passant target, since a pass
    /// cannot be followed by an en-passant capture of a pawn that
    /// advanced on a real ply.
    pub fn make_null_move(&self) -> Position {
        let mut child = self.clone();
        if let Some(old_ep) = child.ep_square.take() {
            child.hash ^= ZOBRIST.en_passant_file[file(old_ep)];
        }
        child.hash ^= ZOBRIST.side_to_move;
        child.to_move = opposite(child.to_move);
        child.ply += 1;
        child.repeated = false;
        child.recompute_caches();
        debug_assert_eq!(child.hash, child.recompute_hash());
        child
    }

    /// Returns the piece occupying `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceType)> {
        let bit = 1u64 << square;
        for side in [WHITE, BLACK] {
            if self.occupied[side] & bit == 0 {
                continue;
            }
            for piece in PIECE_TYPES {
                if self.pieces[side][piece] & bit != 0 {
                    return Some((side, piece));
                }
            }
        }
        None
    }

    fn piece_type_at(&self, side: Color, square: Square) -> Option<PieceType> {
        let bit = 1u64 << square;
        PIECE_TYPES.into_iter().find(|&piece| self.pieces[side][piece] & bit != 0)
    }

    /// Parses a FEN string: the standard six space-separated fields,
    /// or the four-field short form (placement, side to move,
    /// castling, en-passant) used by the specification's own §8
    /// scenarios, which omits the halfmove clock and fullmove number.
    /// The short form defaults both to zero/one.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 4 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }
        let mut pieces = [[0u64; 6]; 2];
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement(fields[0].to_string()));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank_idx = 7 - i; // FEN ranks run 8 -> 1
            let mut file_idx = 0usize;
            for c in rank_str.chars() {
                if let Some(empty) = c.to_digit(10) {
                    file_idx += empty as usize;
                } else {
                    let side = if c.is_ascii_uppercase() { WHITE } else { BLACK };
                    let piece = piece_from_letter(c)
                        .ok_or_else(|| FenError::BadPlacement(fields[0].to_string()))?;
                    if file_idx >= 8 {
                        return Err(FenError::BadPlacement(fields[0].to_string()));
                    }
                    pieces[side][piece] |= 1u64 << square(file_idx, rank_idx);
                    file_idx += 1;
                }
            }
            if file_idx != 8 {
                return Err(FenError::BadPlacement(fields[0].to_string()));
            }
        }

        let to_move = match fields[1] {
            "w" => WHITE,
            "b" => BLACK,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        let mut castling = [false; 4];
        if fields[2] != "-" {
            for c in fields[2].chars() {
                match c {
                    'K' => castling[zobrist::WHITE_SHORT] = true,
                    'Q' => castling[zobrist::WHITE_LONG] = true,
                    'k' => castling[zobrist::BLACK_SHORT] = true,
                    'q' => castling[zobrist::BLACK_LONG] = true,
                    _ => return Err(FenError::BadCastling(fields[2].to_string())),
                }
            }
        }

        let ep_square = if fields[3] == "-" {
            None
        } else {
            Some(
                crate::chess_move::parse_square(fields[3])
                    .ok_or_else(|| FenError::BadEnPassant(fields[3].to_string()))?,
            )
        };

        let halfmove: u32 = if fields.len() == 6 {
            fields[4]
                .parse()
                .map_err(|_| FenError::BadHalfmoveClock(fields[4].to_string()))?
        } else {
            0
        };
        // Full-move number (fields[5], absent in the short form) does
        // not affect search behaviour and is not retained; only the
        // ply count derived from the half-move clock matters to the
        // evaluator's phase blend.

        let mut position = Position {
            pieces,
            occupied: [0; 2],
            to_move,
            castling,
            ep_square,
            ply: halfmove,
            hash: 0,
            mobility: [0; 2],
            scope: [0; 2],
            rep_ring: [0; REPETITION_RING_LEN],
            rep_idx: 0,
            repeated: false,
        };
        position.recompute_caches();
        position.hash = position.recompute_hash();
        Ok(position)
    }

    /// Recomputes the Zobrist hash from scratch. Used both to seed a
    /// freshly parsed position and as the debug invariant check after
    /// every `apply`.
    pub fn recompute_hash(&self) -> u64 {
        let mut h = 0u64;
        if self.to_move == WHITE {
            h ^= ZOBRIST.side_to_move;
        }
        if let Some(ep) = self.ep_square {
            h ^= ZOBRIST.en_passant_file[file(ep)];
        }
        for (i, &right) in self.castling.iter().enumerate() {
            if right {
                h ^= ZOBRIST.castling[i];
            }
        }
        for side in [WHITE, BLACK] {
            for piece in PIECE_TYPES {
                let mut bb = self.pieces[side][piece];
                while bb != 0 {
                    let sq = bitscan_forward(bb);
                    h ^= ZOBRIST.piece_square[side][piece][sq];
                    bb = reset_ls1b(bb);
                }
            }
        }
        h
    }

    fn recompute_caches(&mut self) {
        for side in [WHITE, BLACK] {
            let mut occ = 0u64;
            for piece in PIECE_TYPES {
                occ |= self.pieces[side][piece];
            }
            self.occupied[side] = occ;
        }
        for side in [WHITE, BLACK] {
            let (mobility, scope) = self.compute_mobility_and_scope(side);
            self.mobility[side] = mobility;
            self.scope[side] = scope;
        }
    }

    fn compute_mobility_and_scope(&self, side: Color) -> (u64, u32) {
        let occupied = self.occupied();
        let own = self.occupied[side];
        let mut mobility = 0u64;
        let mut scope = 0u32;
        for piece in [ROOK, BISHOP, QUEEN] {
            let dirs: &[fn(u64) -> u64] = match piece {
                ROOK => &ROOK_DIRS,
                BISHOP => &BISHOP_DIRS,
                _ => &[],
            };
            let mut bb = self.pieces[side][piece];
            while bb != 0 {
                let origin = ls1b(bb);
                bb = reset_ls1b(bb);
                let slider_dirs: &[fn(u64) -> u64] = if piece == QUEEN {
                    &ALL_DIRS
                } else {
                    dirs
                };
                for &dir in slider_dirs {
                    let ray = ray_attacks(origin, dir, own, occupied);
                    mobility |= ray;
                    scope += pop_count(ray);
                }
            }
        }
        let mut knights = self.pieces[side][KNIGHT];
        while knights != 0 {
            let sq = bitscan_forward(knights);
            knights = reset_ls1b(knights);
            let targets = GEOMETRY.knight[sq] & !own;
            mobility |= targets;
            scope += pop_count(targets);
        }
        let king_sq = self.king_square(side);
        let king_targets = GEOMETRY.king[king_sq] & !own;
        mobility |= king_targets;
        scope += pop_count(king_targets);
        let mut pawns = self.pieces[side][PAWN];
        while pawns != 0 {
            let sq = bitscan_forward(pawns);
            pawns = reset_ls1b(pawns);
            let targets = GEOMETRY.pawn_attacks[side][sq] & self.occupied[opposite(side)];
            mobility |= targets;
        }
        (mobility, scope)
    }

    /// True iff `square` is attacked by any piece of color `by`.
    pub fn attacked_by(&self, square: Square, by: Color) -> bool {
        let occupied = self.occupied();
        if GEOMETRY.pawn_attacks[opposite(by)][square] & self.pieces[by][PAWN] != 0 {
            return true;
        }
        if GEOMETRY.knight[square] & self.pieces[by][KNIGHT] != 0 {
            return true;
        }
        if GEOMETRY.king[square] & self.pieces[by][KING] != 0 {
            return true;
        }
        let origin = 1u64 << square;
        let rook_like = self.pieces[by][ROOK] | self.pieces[by][QUEEN];
        for &dir in &ROOK_DIRS {
            if ray_attacks(origin, dir, 0, occupied) & rook_like != 0 {
                return true;
            }
        }
        let bishop_like = self.pieces[by][BISHOP] | self.pieces[by][QUEEN];
        for &dir in &BISHOP_DIRS {
            if ray_attacks(origin, dir, 0, occupied) & bishop_like != 0 {
                return true;
            }
        }
        false
    }

    pub fn in_check(&self, side: Color) -> bool {
        self.attacked_by(self.king_square(side), opposite(side))
    }

    fn clear_castling_right(&mut self, idx: usize) {
        if self.castling[idx] {
            self.hash ^= ZOBRIST.castling[idx];
            self.castling[idx] = false;
        }
    }

    fn clear_castling_rights_for_side(&mut self, side: Color) {
        let (short, long) = if side == WHITE {
            (zobrist::WHITE_SHORT, zobrist::WHITE_LONG)
        } else {
            (zobrist::BLACK_SHORT, zobrist::BLACK_LONG)
        };
        self.clear_castling_right(short);
        self.clear_castling_right(long);
    }

    fn clear_castling_right_if_rook_home_square(&mut self, side: Color, square: Square) {
        let (short_home, short_idx, long_home, long_idx) = if side == WHITE {
            (WHITE_ROOK_SHORT_HOME, zobrist::WHITE_SHORT, WHITE_ROOK_LONG_HOME, zobrist::WHITE_LONG)
        } else {
            (BLACK_ROOK_SHORT_HOME, zobrist::BLACK_SHORT, BLACK_ROOK_LONG_HOME, zobrist::BLACK_LONG)
        };
        if square == short_home {
            self.clear_castling_right(short_idx);
        } else if square == long_home {
            self.clear_castling_right(long_idx);
        }
    }

    /// Applies `mv` to the position. Steps follow the order: resolve
    /// mover/capture, update the hash and bitboards for the departure
    /// and arrival squares, handle en-passant capture, update the
    /// en-passant target, handle castling rook movement and castling
    /// rights, flip the side to move, and refresh the cached
    /// occupancy/mobility/scope.
    pub fn apply(&mut self, mv: Move) {
        let side = self.to_move;
        let other = opposite(side);

        let moving_piece = self
            .piece_type_at(side, mv.from)
            .expect("apply: no piece of the side to move on the source square");
        let captured_piece = if mv.is_en_passant {
            None
        } else {
            self.piece_type_at(other, mv.to)
        };

        self.hash ^= ZOBRIST.piece_square[side][moving_piece][mv.from];
        self.pieces[side][moving_piece] &= !(1u64 << mv.from);
        if let Some(cp) = captured_piece {
            self.hash ^= ZOBRIST.piece_square[other][cp][mv.to];
            self.pieces[other][cp] &= !(1u64 << mv.to);
        }

        let landing_piece = if mv.is_promotion { mv.promotion } else { moving_piece };
        self.hash ^= ZOBRIST.piece_square[side][landing_piece][mv.to];
        self.pieces[side][landing_piece] |= 1u64 << mv.to;

        if mv.is_en_passant {
            let captured_sq = if side == WHITE { mv.to - 8 } else { mv.to + 8 };
            self.hash ^= ZOBRIST.piece_square[other][PAWN][captured_sq];
            self.pieces[other][PAWN] &= !(1u64 << captured_sq);
        }

        if let Some(old_ep) = self.ep_square.take() {
            self.hash ^= ZOBRIST.en_passant_file[file(old_ep)];
        }
        if moving_piece == PAWN {
            let delta = mv.to as i32 - mv.from as i32;
            if delta == 16 || delta == -16 {
                let ep_sq = if side == WHITE { mv.from + 8 } else { mv.from - 8 };
                self.ep_square = Some(ep_sq);
                self.hash ^= ZOBRIST.en_passant_file[file(ep_sq)];
            }
        }

        if mv.is_castle {
            let (rook_from, rook_to) = castle_rook_squares(side, mv.to);
            self.hash ^= ZOBRIST.piece_square[side][ROOK][rook_from];
            self.pieces[side][ROOK] &= !(1u64 << rook_from);
            self.hash ^= ZOBRIST.piece_square[side][ROOK][rook_to];
            self.pieces[side][ROOK] |= 1u64 << rook_to;
            self.clear_castling_rights_for_side(side);
        } else if moving_piece == KING {
            self.clear_castling_rights_for_side(side);
        } else if moving_piece == ROOK {
            self.clear_castling_right_if_rook_home_square(side, mv.from);
        }
        if let Some(cp) = captured_piece {
            if cp == ROOK {
                self.clear_castling_right_if_rook_home_square(other, mv.to);
            }
        }

        self.hash ^= ZOBRIST.side_to_move;
        self.to_move = other;
        self.ply += 1;

        self.recompute_caches();
        // Must run before `push_repetition_hash`: once this position's
        // own hash is in the ring, checking membership against it is
        // vacuously true.
        self.repeated = self.rep_ring.contains(&self.hash);
        self.push_repetition_hash();

        debug_assert_eq!(self.hash, self.recompute_hash());
        debug_assert_eq!(self.occupied[WHITE] & self.occupied[BLACK], 0);
    }

    /// Records the current hash in the repetition ring. `apply` is the
    /// only caller: every real move -- made by the search or replayed
    /// by the UCI collaborator from `position ... moves ...` -- goes
    /// through it, so the ring always advances on its own.
    fn push_repetition_hash(&mut self) {
        self.rep_ring[self.rep_idx % REPETITION_RING_LEN] = self.hash;
        self.rep_idx = self.rep_idx.wrapping_add(1);
    }

    /// Whether this position's hash matched one still held in the
    /// ring at the moment it was reached (computed by `apply`).
    pub fn is_recent_repetition(&self) -> bool {
        self.repeated
    }

    /// Produces the pseudo-legal move list for the side to move. When
    /// `captures_only` is set, quiet moves are omitted except
    /// queen promotions, which quiescence always considers. Returns
    /// the number of moves appended.
    pub fn generate(&self, into: &mut Vec<Move>, captures_only: bool) -> usize {
        let start_len = into.len();
        let side = self.to_move;
        let other = opposite(side);
        let own = self.occupied[side];
        let enemy = self.occupied[other];
        let occupied = own | enemy;

        self.generate_pawn_moves(into, captures_only);

        let king_sq = self.king_square(side);
        let mut king_targets = GEOMETRY.king[king_sq] & !own;
        if captures_only {
            king_targets &= enemy;
        }
        let mut targets = king_targets;
        while targets != 0 {
            let to = bitscan_forward(targets);
            targets = reset_ls1b(targets);
            into.push(Move {
                from: king_sq,
                to,
                is_capture: enemy & (1u64 << to) != 0,
                ..Move::INVALID
            });
        }
        if !captures_only {
            self.generate_castles(into, side, king_sq, occupied);
        }

        let mut knights = self.pieces[side][KNIGHT];
        while knights != 0 {
            let from = bitscan_forward(knights);
            knights = reset_ls1b(knights);
            let mut knight_targets = GEOMETRY.knight[from] & !own;
            if captures_only {
                knight_targets &= enemy;
            }
            while knight_targets != 0 {
                let to = bitscan_forward(knight_targets);
                knight_targets = reset_ls1b(knight_targets);
                into.push(Move {
                    from,
                    to,
                    is_capture: enemy & (1u64 << to) != 0,
                    ..Move::INVALID
                });
            }
        }

        for &(piece, dirs) in &[(ROOK, &ROOK_DIRS[..]), (BISHOP, &BISHOP_DIRS[..])] {
            let mut sliders = self.pieces[side][piece] | self.pieces[side][QUEEN];
            while sliders != 0 {
                let from = bitscan_forward(sliders);
                sliders = reset_ls1b(sliders);
                let origin = 1u64 << from;
                let mut reach = 0u64;
                for &dir in dirs {
                    reach |= ray_attacks(origin, dir, own, occupied);
                }
                if captures_only {
                    reach &= enemy;
                }
                while reach != 0 {
                    let to = bitscan_forward(reach);
                    reach = reset_ls1b(reach);
                    into.push(Move {
                        from,
                        to,
                        is_capture: enemy & (1u64 << to) != 0,
                        ..Move::INVALID
                    });
                }
            }
        }

        into.len() - start_len
    }

    fn generate_pawn_moves(&self, into: &mut Vec<Move>, captures_only: bool) {
        let side = self.to_move;
        let other = opposite(side);
        let occupied = self.occupied();
        let enemy = self.occupied[other];
        let (push, start_rank, last_rank): (fn(u64) -> u64, Rank, Rank) = if side == WHITE {
            (north, RANK_2, RANK_7)
        } else {
            (south, RANK_7, RANK_2)
        };

        let mut pawns = self.pieces[side][PAWN];
        while pawns != 0 {
            let from = bitscan_forward(pawns);
            pawns = reset_ls1b(pawns);
            let origin = 1u64 << from;
            let one_step = push(origin) & !occupied;

            if one_step != 0 && !captures_only {
                let to = bitscan_forward(one_step);
                self.push_pawn_move(into, from, to, last_rank, false, false);
                if rank(from) == start_rank {
                    let two_step = push(one_step) & !occupied;
                    if two_step != 0 {
                        let to2 = bitscan_forward(two_step);
                        into.push(Move::quiet(from, to2));
                    }
                }
            } else if one_step != 0 && captures_only {
                // Quiescence still considers quiet queen promotions.
                let to = bitscan_forward(one_step);
                if rank(to) == last_rank {
                    into.push(Move {
                        from,
                        to,
                        promotion: QUEEN,
                        is_promotion: true,
                        ..Move::INVALID
                    });
                }
            }

            let mut capture_targets = GEOMETRY.pawn_attacks[side][from] & enemy;
            while capture_targets != 0 {
                let to = bitscan_forward(capture_targets);
                capture_targets = reset_ls1b(capture_targets);
                self.push_pawn_move(into, from, to, last_rank, true, false);
            }
            if let Some(ep) = self.ep_square {
                if GEOMETRY.pawn_attacks[side][from] & (1u64 << ep) != 0 {
                    into.push(Move {
                        from,
                        to: ep,
                        is_capture: true,
                        is_en_passant: true,
                        ..Move::INVALID
                    });
                }
            }
        }
    }

    fn push_pawn_move(
        &self,
        into: &mut Vec<Move>,
        from: Square,
        to: Square,
        last_rank: Rank,
        is_capture: bool,
        is_en_passant: bool,
    ) {
        if rank(to) == last_rank {
            for &promotion in &[QUEEN, ROOK, BISHOP, KNIGHT] {
                into.push(Move {
                    from,
                    to,
                    promotion,
                    is_capture,
                    is_en_passant,
                    is_promotion: true,
                    ..Move::INVALID
                });
            }
        } else {
            into.push(Move {
                from,
                to,
                is_capture,
                is_en_passant,
                ..Move::INVALID
            });
        }
    }

    fn generate_castles(&self, into: &mut Vec<Move>, side: Color, king_sq: Square, occupied: u64) {
        let other = opposite(side);
        let (short_idx, long_idx, short_to, long_to, long_pass_sq) = if side == WHITE {
            (zobrist::WHITE_SHORT, zobrist::WHITE_LONG, 6usize, 2usize, 1usize)
        } else {
            (zobrist::BLACK_SHORT, zobrist::BLACK_LONG, 62usize, 58usize, 57usize)
        };

        if self.castling[short_idx] {
            let between = king_sq + 1..short_to;
            let clear = between.clone().all(|sq| occupied & (1u64 << sq) == 0)
                && occupied & (1u64 << (king_sq + 1)) == 0
                && occupied & (1u64 << short_to) == 0;
            let safe = !self.attacked_by(king_sq, other)
                && !self.attacked_by(king_sq + 1, other)
                && !self.attacked_by(short_to, other);
            if clear && safe {
                into.push(Move {
                    from: king_sq,
                    to: short_to,
                    is_castle: true,
                    ..Move::INVALID
                });
            }
        }
        if self.castling[long_idx] {
            let clear = occupied & (1u64 << (king_sq - 1)) == 0
                && occupied & (1u64 << long_to) == 0
                && occupied & (1u64 << long_pass_sq) == 0;
            let safe = !self.attacked_by(king_sq, other)
                && !self.attacked_by(king_sq - 1, other)
                && !self.attacked_by(long_to, other);
            if clear && safe {
                // The destination square for a long castle is exactly
                // two files from the king's origin -- verified here
                // rather than trusted, since an earlier revision of
                // this generator validated it only after computing
                // the resulting position.
                debug_assert_eq!(file(king_sq) as i32 - file(long_to) as i32, 2);
                into.push(Move {
                    from: king_sq,
                    to: long_to,
                    is_castle: true,
                    ..Move::INVALID
                });
            }
        }
    }

    /// The move-ordering heuristic score used by `sort`: capture and
    /// castle bonuses, the blended piece-square-table delta, the
    /// static value of anything captured, a penalty if the
    /// destination is defended, and the value of any promotion piece.
    pub fn estimate_move_value(&self, mv: Move) -> i32 {
        let side = self.to_move;
        let other = opposite(side);
        let mover = self
            .piece_type_at(side, mv.from)
            .expect("estimate_move_value: no piece on source square");
        let mut score = 0i32;
        if mv.is_capture {
            score += eval::CAPTURE_BONUS;
        }
        if mv.is_castle {
            score += eval::CASTLE_BONUS;
        }
        if mv.is_en_passant {
            score += eval::piece_value_mg(PAWN);
        }
        let phase = eval::phase(self);
        score += eval::blended_pst(mover, side, mv.to, phase) - eval::blended_pst(mover, side, mv.from, phase);
        if let Some(captured) = self.piece_type_at(other, mv.to) {
            score += eval::piece_value_mg(captured);
        }
        if self.mobility[other] & (1u64 << mv.to) != 0 {
            score -= eval::piece_value_mg(mover);
        }
        if mv.is_promotion {
            score += eval::piece_value_mg(mv.promotion);
        }
        score
    }
}

/// All eight compass directions, used by the queen when computing
/// mobility/scope (the generator itself walks rook and bishop
/// directions separately, since a queen is just "rook or bishop").
const ALL_DIRS: [fn(u64) -> u64; 8] = [north, south, east, west, north_east, north_west, south_east, south_west];

fn castle_rook_squares(side: Color, king_to: Square) -> (Square, Square) {
    if file(king_to) == FILE_G {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_hash_matches_recomputation() {
        let pos = Position::start();
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn start_position_occupancy_disjoint() {
        let pos = Position::start();
        assert_eq!(pos.occupied[WHITE] & pos.occupied[BLACK], 0);
        assert_eq!(pop_count(pos.occupied()), 32);
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::start();
        let mut moves = Vec::new();
        assert_eq!(pos.generate(&mut moves, false), 20);
    }

    #[test]
    fn apply_preserves_hash_invariant() {
        let mut pos = Position::start();
        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        let mv = moves[0];
        pos.apply(mv);
        assert_eq!(pos.hash(), pos.recompute_hash());
        assert_eq!(pos.to_move(), BLACK);
    }

    #[test]
    fn en_passant_capture_clears_pawn() {
        let mut pos = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
        )
        .unwrap();
        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        let ep = moves.iter().find(|m| m.is_en_passant).expect("no en-passant move generated");
        pos.apply(*ep);
        assert_eq!(pos.pieces[WHITE][PAWN] & (1u64 << square(FILE_E, RANK_4)), 0);
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn castling_through_check_is_forbidden() {
        // Black rook on e8 bears on e1 through an otherwise empty
        // king-side castling path; white must not be allowed to
        // castle short.
        let pos = Position::from_fen("4r3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        assert!(!moves.iter().any(|m| m.is_castle));
    }

    #[test]
    fn promotion_emits_four_moves() {
        let pos = Position::from_fen("8/4P3/8/8/8/8/8/4k2K w - - 0 1").unwrap();
        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        let promotions: Vec<_> = moves.iter().filter(|m| m.is_promotion).collect();
        assert_eq!(promotions.len(), 4);
    }

    #[test]
    fn rook_move_clears_only_its_own_castling_right() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(pos.has_castling_right(zobrist::WHITE_LONG));
        assert!(pos.has_castling_right(zobrist::WHITE_SHORT));

        let mut moves = Vec::new();
        pos.generate(&mut moves, false);
        let mv = *moves
            .iter()
            .find(|m| m.from == square(FILE_A, RANK_1) && m.to == square(FILE_B, RANK_1))
            .expect("rook a1-b1 not among legal moves");
        pos.apply(mv);

        assert!(!pos.has_castling_right(zobrist::WHITE_LONG));
        assert!(pos.has_castling_right(zobrist::WHITE_SHORT));
        assert_eq!(pos.hash(), pos.recompute_hash());
    }
}
