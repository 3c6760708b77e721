//! Iterative-deepening negamax with alpha-beta, null-move reduction,
//! late-move reduction, quiescence, aspiration windows,
//! principal-variation tracking and three-fold-repetition detection.

pub mod history;
pub mod perft;
pub mod threading;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::basetypes::*;
use crate::chess_move::Move;
use crate::eval;
use crate::position::Position;
use crate::tt::{self, NodeType, TranspositionTable};
use history::History;

pub const MAX_DEPTH: usize = 64;
pub const MAX_PVS: usize = 5;
pub const MAX_MOVES: usize = 226;
pub const LATE_MOVE_CUTOFF: usize = 2;
pub const LATE_MOVE_CUTOFF_2: usize = 4;
pub const ASPIRATION_START: i32 = 35;
pub const ASPIRATION_DELTA: i32 = 25;
pub const DRAW_THRESHOLD: i32 = 60;
pub const TIME_BUFFER: Duration = Duration::from_millis(100);
pub const INFINITE_TIMELIMIT: Duration = Duration::from_millis(3_600_000);

const INF: i32 = 1_000_000_000;
const NEG_INF: i32 = -INF;

fn reduce1(max_depth: i32) -> i32 {
    3 * max_depth / 4
}

fn reduce2(max_depth: i32) -> i32 {
    2 * max_depth / 3
}

/// The reduced search depth for a late, quiet, non-check move, per
/// the move-count-based LMR policy.
fn reduce(max_depth: i32, moves_searched: usize) -> i32 {
    if moves_searched > LATE_MOVE_CUTOFF_2 {
        reduce2(max_depth).max(max_depth - 1).min(max_depth)
    } else if moves_searched > LATE_MOVE_CUTOFF {
        reduce1(max_depth).max(max_depth - 1)
    } else {
        max_depth
    }
}

#[derive(Clone, Copy)]
pub struct SearchOptions {
    pub multi_pv: usize,
    pub use_history: bool,
    pub use_aspiration: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { multi_pv: 1, use_history: true, use_aspiration: true }
    }
}

pub struct SearchLimits {
    pub max_depth: i32,
    pub movetime: Duration,
}

impl SearchLimits {
    pub fn infinite(max_depth: i32) -> SearchLimits {
        SearchLimits { max_depth, movetime: INFINITE_TIMELIMIT }
    }
}

/// One principal-variation line as reported to the UCI collaborator.
#[derive(Clone)]
pub struct RootLine {
    pub score: i32,
    pub moves: Vec<Move>,
}

/// Data for one `info` line; the UCI layer is responsible for
/// formatting it as text.
pub struct SearchInfo<'a> {
    pub depth: i32,
    pub seldepth: i32,
    pub nodes: u64,
    pub time: Duration,
    pub multipv: usize,
    pub line: &'a RootLine,
}

pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth_reached: i32,
}

pub struct Search<'a> {
    tt: &'a mut TranspositionTable,
    history: History,
    stop: &'a AtomicBool,
    start: Instant,
    time_limit: Duration,
    nodes: u64,
    seldepth: i32,
    quiesce_max_depth: i32,
    /// `curr_pv[depth]` is the principal-variation move chosen at
    /// `depth` along the path currently being assembled; the array is
    /// shared across recursive calls (not one copy per frame) and a
    /// fresh call always clears its own depth slot on entry, so a
    /// stale deeper continuation never outlives the subtree that
    /// produced it.
    curr_pv: [Move; MAX_DEPTH],
    root_lines: Vec<RootLine>,
    options: SearchOptions,
}

impl<'a> Search<'a> {
    pub fn new(tt: &'a mut TranspositionTable, stop: &'a AtomicBool, options: SearchOptions) -> Search<'a> {
        Search {
            tt,
            history: History::new(),
            stop,
            start: Instant::now(),
            time_limit: INFINITE_TIMELIMIT,
            nodes: 0,
            seldepth: 0,
            quiesce_max_depth: 0,
            curr_pv: [Move::INVALID; MAX_DEPTH],
            root_lines: Vec::new(),
            options,
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Runs iterative deepening from depth 1 to `limits.max_depth`,
    /// calling `on_info` once per completed iteration per reported PV
    /// slot. Returns the best move found by the last fully completed
    /// iteration; if cancellation fired before depth 1 completed, the
    /// move found so far (possibly a partial depth-1 result) is
    /// returned instead.
    pub fn iterative_deepening(
        &mut self,
        position: &Position,
        limits: SearchLimits,
        mut on_info: impl FnMut(&SearchInfo),
    ) -> SearchResult {
        self.start = Instant::now();
        self.time_limit = limits.movetime;
        self.stop.store(false, Ordering::Relaxed);

        let mut best = SearchResult { best_move: Move::INVALID, score: 0, depth_reached: 0 };
        let mut alpha = NEG_INF;
        let mut beta = INF;
        let mut previous_eval = 0;

        for iter in 1..=limits.max_depth {
            self.nodes = 0;
            self.seldepth = iter;
            self.history.clear();
            self.quiesce_max_depth = (2 * iter).min(MAX_DEPTH as i32 - 1);

            if self.options.use_aspiration && iter > 1 {
                alpha = previous_eval - ASPIRATION_START;
                beta = previous_eval + ASPIRATION_START;
            } else {
                alpha = NEG_INF;
                beta = INF;
            }

            let mut retries = 0;
            let score = loop {
                self.root_lines.clear();
                let score = self.negamax(position, alpha, beta, iter, 0);
                if self.stop.load(Ordering::Relaxed) {
                    break score;
                }
                if score >= beta && retries < 2 {
                    beta += ASPIRATION_DELTA * (retries + 1);
                    retries += 1;
                    continue;
                }
                if score <= alpha && retries < 2 {
                    alpha -= ASPIRATION_DELTA * (retries + 1);
                    retries += 1;
                    continue;
                }
                if score <= alpha || score >= beta {
                    alpha = NEG_INF;
                    beta = INF;
                    continue;
                }
                break score;
            };

            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            previous_eval = score;
            best.score = score;
            best.depth_reached = iter;
            if let Some(first) = self.root_lines.first() {
                best.best_move = first.moves.first().copied().unwrap_or(Move::INVALID);
            }

            for (i, line) in self.root_lines.iter().enumerate() {
                let info = SearchInfo {
                    depth: iter,
                    seldepth: self.seldepth,
                    nodes: self.nodes,
                    time: self.elapsed(),
                    multipv: i + 1,
                    line,
                };
                on_info(&info);
            }

            if score.abs() > eval::mate_score(MAX_DEPTH as i32) {
                break;
            }
        }

        self.stop.store(false, Ordering::Relaxed);
        best
    }

    fn record_root_line(&mut self, score: i32, mv: Move) {
        let mut moves = vec![mv];
        for &m in self.curr_pv[1..].iter() {
            if !m.is_valid() {
                break;
            }
            moves.push(m);
        }
        self.root_lines.push(RootLine { score, moves });
        self.root_lines.sort_by(|a, b| b.score.cmp(&a.score));
        self.root_lines.truncate(self.options.multi_pv.max(1));
    }

    fn negamax(&mut self, position: &Position, mut alpha: i32, beta: i32, mut max_depth: i32, depth: i32) -> i32 {
        if self.stop.load(Ordering::Relaxed) {
            return NEG_INF;
        }
        self.curr_pv[depth as usize] = Move::INVALID;
        self.nodes += 1;

        let hash = position.hash();
        let mut tt_move = Move::INVALID;
        let remaining = max_depth - depth;
        if let Some(entry) = self.tt.probe(hash) {
            tt_move = entry.best_move;
            if tt::is_usable(entry, remaining, alpha, beta) {
                return entry.eval;
            }
        }

        if depth == max_depth {
            if self.elapsed() >= self.time_limit.saturating_sub(TIME_BUFFER) {
                self.stop.store(true, Ordering::Relaxed);
            }
            let score = self.quiesce(position, alpha, beta, depth);
            self.tt.store(hash, Move::INVALID, score, 0, NodeType::Pv);
            return score;
        }

        let side = position.to_move();
        let in_check = position.in_check(side);
        if depth == max_depth - 1 && in_check {
            max_depth = (max_depth + 2).min(MAX_DEPTH as i32);
        }

        if !in_check && depth + 3 < max_depth && position.ply() < eval::ENDGAME_CUTOFF {
            let null_position = position.make_null_move();
            let score = -self.negamax(&null_position, -beta, -alpha, depth + 3, depth + 1);
            if score >= beta {
                let reduced = reduce1(max_depth);
                if depth < reduced {
                    max_depth = reduced;
                } else {
                    self.tt.store(hash, Move::INVALID, beta, max_depth - depth, NodeType::Cut);
                    return beta;
                }
            }
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        position.generate(&mut moves, false);
        sort_moves(position, &mut moves, tt_move, self.options.use_history.then_some(&self.history));

        let original_alpha = alpha;
        let mut best_score = NEG_INF;
        let mut best_move = Move::INVALID;
        let mut moves_searched = 0usize;
        let mut tried_quiet = Vec::new();
        let mut any_legal = false;

        for &mv in &moves {
            let child = position.clone_and_apply(mv);
            if child.in_check(side) {
                continue;
            }
            any_legal = true;
            let gives_check = child.in_check(child.to_move());
            let is_quiet = !mv.is_capture && !mv.is_promotion && !mv.is_en_passant;

            let score = if depth > 0 && child.is_recent_repetition() {
                if depth % 2 == 0 {
                    -DRAW_THRESHOLD
                } else {
                    0
                }
            } else {
                let new_depth = if !in_check && is_quiet && !gives_check {
                    reduce(max_depth, moves_searched)
                } else {
                    max_depth
                };
                let mut s = -self.negamax(&child, -beta, -alpha, new_depth, depth + 1);
                if new_depth < max_depth && s > alpha {
                    s = -self.negamax(&child, -beta, -alpha, max_depth, depth + 1);
                }
                s
            };

            moves_searched += 1;
            if is_quiet {
                tried_quiet.push((mv.from, mv.to));
            }

            if depth == 0 {
                self.record_root_line(score, mv);
            }

            if score >= beta {
                self.tt.store(hash, mv, beta, max_depth - depth, NodeType::Cut);
                if self.options.use_history && is_quiet {
                    self.history.record_cutoff(side, (mv.from, mv.to), &tried_quiet, max_depth - depth);
                }
                return beta;
            }
            if score > best_score {
                best_score = score;
                best_move = mv;
                self.curr_pv[depth as usize] = mv;
            }
            if score > alpha {
                alpha = score;
            }
        }

        if !any_legal {
            return if in_check { -eval::mate_score(depth + 1) } else { 0 };
        }

        let node_type = if best_score > original_alpha { NodeType::Pv } else { NodeType::All };
        self.tt.store(hash, best_move, best_score, max_depth - depth, node_type);
        best_score
    }

    fn quiesce(&mut self, position: &Position, mut alpha: i32, beta: i32, depth: i32) -> i32 {
        self.nodes += 1;
        if depth > self.seldepth {
            self.seldepth = depth;
        }
        let stand_pat = eval::evaluate(position);
        if depth >= self.quiesce_max_depth {
            return stand_pat;
        }
        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        position.generate(&mut moves, true);
        sort_moves(position, &mut moves, Move::INVALID, None);

        let side = position.to_move();
        let mut best = stand_pat;
        for &mv in &moves {
            let child = position.clone_and_apply(mv);
            if child.in_check(side) {
                continue;
            }
            let score = -self.quiesce(&child, -beta, -alpha, depth + 1);
            if score > best {
                best = score;
            }
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }
        best
    }
}

/// Scores every move with `Position::estimate_move_value`, boosts the
/// TT move, optionally folds in the history heuristic, and sorts
/// descending.
pub fn sort_moves(position: &Position, moves: &mut [Move], tt_move: Move, history: Option<&History>) {
    let side = position.to_move();
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|&mv| {
            let mut score = position.estimate_move_value(mv);
            if tt_move.is_valid() && mv.same_move(tt_move.from, tt_move.to, tt_move.promotion) {
                score += 10_000;
            }
            if let Some(h) = history {
                score += h.score(side, mv.from, mv.to);
            }
            (score, mv)
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    for (slot, &(_, mv)) in moves.iter_mut().zip(scored.iter()) {
        *slot = mv;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt::TranspositionTable;

    #[test]
    fn finds_mate_in_one() {
        // White to move, mate in one with Qh5#-style back-rank mate.
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(16);
        let stop = AtomicBool::new(false);
        let mut search = Search::new(&mut tt, &stop, SearchOptions::default());
        let result = search.iterative_deepening(&position, SearchLimits::infinite(4), |_| {});
        assert!(result.score > eval::mate_score(5));
    }

    #[test]
    fn stalemate_scores_zero() {
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(16);
        let stop = AtomicBool::new(false);
        let mut search = Search::new(&mut tt, &stop, SearchOptions::default());
        let score = search.negamax(&position, NEG_INF, INF, 1, 0);
        assert_eq!(score, 0);
    }
}
