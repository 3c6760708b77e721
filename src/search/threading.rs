//! The search's concurrency boundary: a `go` command runs on its own
//! worker thread so the input reader keeps draining stdin while a
//! search is in flight. Exactly one search is ever in flight; the UCI
//! loop stops and joins the previous one before starting the next, so
//! the transposition table can be moved into the worker thread rather
//! than shared behind a lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::chess_move::Move;
use crate::position::Position;
use crate::tt::TranspositionTable;

use super::{RootLine, Search, SearchInfo, SearchLimits, SearchOptions, SearchResult};

/// An owned snapshot of one `SearchInfo`, suitable for crossing the
/// thread boundary.
pub struct InfoMessage {
    pub depth: i32,
    pub seldepth: i32,
    pub nodes: u64,
    pub time: Duration,
    pub multipv: usize,
    pub line: RootLine,
}

impl From<&SearchInfo<'_>> for InfoMessage {
    fn from(info: &SearchInfo<'_>) -> Self {
        InfoMessage {
            depth: info.depth,
            seldepth: info.seldepth,
            nodes: info.nodes,
            time: info.time,
            multipv: info.multipv,
            line: info.line.clone(),
        }
    }
}

pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<(TranspositionTable, SearchResult)>,
    info_rx: Receiver<InfoMessage>,
}

impl SearchHandle {
    pub fn spawn(
        position: Position,
        mut tt: TranspositionTable,
        limits: SearchLimits,
        options: SearchOptions,
    ) -> SearchHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = {
                let mut search = Search::new(&mut tt, &worker_stop, options);
                search.iterative_deepening(&position, limits, |info| {
                    let _ = tx.send(InfoMessage::from(info));
                })
            };
            (tt, result)
        });

        SearchHandle { stop, handle, info_rx: rx }
    }

    /// Signals cancellation; the worker finishes promptly and still
    /// returns a valid result from the last completed iteration.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// True once the worker thread has returned on its own (reached
    /// its depth/time budget without anyone calling `request_stop`).
    /// The protocol loop polls this so a standalone `go` still emits
    /// `bestmove` the moment the search concludes, not only when the
    /// next command arrives.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Drains any `info` messages produced since the last call,
    /// without blocking.
    pub fn poll_info(&self) -> Vec<InfoMessage> {
        self.info_rx.try_iter().collect()
    }

    /// Blocks until the worker finishes, returning the transposition
    /// table (so the next search can reuse it) and the result.
    pub fn join(self) -> (TranspositionTable, SearchResult) {
        self.handle.join().expect("search worker thread panicked")
    }
}

/// Falls back to the best move at depth 1 when a search is cancelled
/// before any iteration completed, per the cancellation-semantics note.
pub fn fallback_move(position: &Position) -> Move {
    let mut moves = Vec::new();
    position.generate(&mut moves, false);
    let side = position.to_move();
    moves
        .into_iter()
        .find(|&mv| !position.clone_and_apply(mv).in_check(side))
        .unwrap_or(Move::INVALID)
}
