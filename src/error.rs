//! Error types for the two places this engine accepts untrusted text:
//! FEN strings and UCI move text. Internal invariant violations are
//! never represented here -- those are programming bugs and are
//! asserted on in debug builds instead (see `Position::apply`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FenError {
    #[error("FEN must have 4 or 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("malformed piece placement field: {0}")]
    BadPlacement(String),
    #[error("side to move must be 'w' or 'b', found {0}")]
    BadSideToMove(String),
    #[error("malformed castling availability field: {0}")]
    BadCastling(String),
    #[error("malformed en-passant target square: {0}")]
    BadEnPassant(String),
    #[error("malformed half-move clock: {0}")]
    BadHalfmoveClock(String),
}

#[derive(Debug, Error)]
pub enum UciError {
    #[error("unrecognized command: {0}")]
    UnknownCommand(String),
    #[error("malformed move text: {0}")]
    BadMoveText(String),
    #[error("illegal move from collaborator: {0}")]
    IllegalMove(String),
    #[error(transparent)]
    Fen(#[from] FenError),
}
