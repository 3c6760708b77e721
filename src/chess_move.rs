//! The `Move` type: a compact description of one ply, plus its text
//! encoding for the UCI protocol.

use lazy_static::lazy_static;
use regex::Regex;

use crate::basetypes::*;

lazy_static! {
    /// Validates the shape of long algebraic move text (`e2e4`,
    /// `e7e8q`) before the plain per-square parse below runs. The rest
    /// of the UCI tokenizing in `uci.rs` is whitespace-split, matching
    /// the source engine's own `stringstream` tokenizing; this is the
    /// one place a regex earns its keep, rejecting garbage input in
    /// one shot instead of several chained `Option` checks.
    static ref UCI_MOVE_RE: Regex = Regex::new(r"^[a-h][1-8][a-h][1-8][qrbn]?$").unwrap();
}

/// A single move. The default value (`from == to == 0`, no promotion,
/// no flags set) is the sentinel "invalid move" used to fill unused
/// principal-variation slots and as the "no move yet" TT entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: PieceType,
    pub is_capture: bool,
    pub is_castle: bool,
    pub is_en_passant: bool,
    pub is_promotion: bool,
}

impl Move {
    pub const INVALID: Move = Move {
        from: 0,
        to: 0,
        promotion: NO_PIECE,
        is_capture: false,
        is_castle: false,
        is_en_passant: false,
        is_promotion: false,
    };

    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Move::INVALID
    }

    /// Same source, destination and promotion piece -- used to match
    /// a generated move against a TT move or a move parsed from UCI
    /// text, which carries no classification flags of its own.
    #[inline]
    pub fn same_move(&self, from: Square, to: Square, promotion: PieceType) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }

    pub fn quiet(from: Square, to: Square) -> Move {
        Move { from, to, ..Move::INVALID }
    }

    /// Renders the move in long algebraic notation, e.g. `e2e4` or
    /// `e7e8q`.
    pub fn to_uci(&self) -> String {
        let mut s = String::with_capacity(5);
        s.push(file_letter(file(self.from)));
        s.push_str(&(rank(self.from) + 1).to_string());
        s.push(file_letter(file(self.to)));
        s.push_str(&(rank(self.to) + 1).to_string());
        if self.is_promotion {
            s.push(piece_letter(self.promotion).to_ascii_lowercase());
        }
        s
    }
}

fn file_letter(f: File) -> char {
    (b'a' + f as u8) as char
}

/// Parses a square given in algebraic form, e.g. `e4`.
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let f = chars.next()?;
    let r = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if !('a'..='h').contains(&f) || !('1'..='8').contains(&r) {
        return None;
    }
    Some(square((f as u8 - b'a') as File, (r as u8 - b'1') as Rank))
}

/// Parses long algebraic move text (`e2e4`, `e7e8q`) into the bare
/// from/to/promotion triple. Classification flags (capture, castle,
/// en-passant) are filled in by the position when the move is matched
/// against its pseudo-legal move list -- text alone cannot determine
/// them.
pub fn parse_uci_move(s: &str) -> Option<(Square, Square, PieceType)> {
    if !UCI_MOVE_RE.is_match(s) {
        return None;
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    let promotion = if s.len() == 5 {
        piece_from_letter(s.as_bytes()[4] as char)?
    } else {
        NO_PIECE
    };
    Some((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uci_roundtrip() {
        let (from, to, promotion) = parse_uci_move("e7e8q").unwrap();
        let mv = Move {
            from,
            to,
            promotion,
            is_promotion: true,
            ..Move::INVALID
        };
        assert_eq!(mv.to_uci(), "e7e8q");
    }

    #[test]
    fn quiet_move_roundtrip() {
        let (from, to, promotion) = parse_uci_move("e2e4").unwrap();
        let mv = Move::quiet(from, to);
        assert_eq!(promotion, NO_PIECE);
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn sentinel_is_invalid() {
        assert!(!Move::INVALID.is_valid());
    }
}
