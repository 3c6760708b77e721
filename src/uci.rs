//! The UCI text protocol: reads commands from stdin, drives the
//! engine, and writes `info`/`bestmove` lines to stdout. Stdout is
//! reserved for the protocol; all diagnostics go through `log`
//! instead (see SPEC_FULL.md §2 and §9 item 2).

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::chess_move::{parse_uci_move, Move};
use crate::error::UciError;
use crate::eval;
use crate::position::Position;
use crate::search::threading::{fallback_move, InfoMessage, SearchHandle};
use crate::search::{perft, SearchLimits, SearchOptions};
use crate::tt::TranspositionTable;

const MAX_MULTIPV: usize = 5;

struct Engine {
    position: Position,
    tt: TranspositionTable,
    options: SearchOptions,
    debug: bool,
    tt_size_log2: u32,
}

impl Engine {
    fn new(tt_size_log2: u32) -> Engine {
        Engine {
            position: Position::start(),
            tt: TranspositionTable::new(tt_size_log2),
            options: SearchOptions::default(),
            debug: false,
            tt_size_log2,
        }
    }
}

/// How often the protocol loop wakes up to check whether a running
/// search has finished on its own, in between lines arriving on
/// stdin.
const SEARCH_POLL_INTERVAL: Duration = Duration::from_millis(15);

/// Runs the protocol loop to completion (until `quit` or EOF). This is
/// the analogue of `sohilbot`'s `commandLineThread`: a new command
/// that implies a fresh search always joins the previous one first;
/// `isready` joins synchronously too, but never starts a search of
/// its own. `tt_size_log2` comes from the process's `--tt-size-log2`/
/// `--tt-mb` startup flags, not from the UCI protocol itself.
///
/// Stdin is read on its own thread (the "input reader" task) and fed
/// to this loop over a channel, so the loop is never blocked waiting
/// on a line: it also needs to notice, on its own, the moment a
/// `go` that was left to run to its own depth/time budget completes,
/// and emit `bestmove` right then rather than only when the next
/// command arrives.
pub fn run(tt_size_log2: u32) -> io::Result<()> {
    let mut engine = Engine::new(tt_size_log2);
    let mut pending: Option<SearchHandle> = None;
    let lines = spawn_input_reader();

    loop {
        if let Some(handle) = &pending {
            flush_info(handle, &engine);
            if handle.is_finished() {
                let handle = pending.take().unwrap();
                let (tt, result) = handle.join();
                engine.tt = tt;
                emit_bestmove(&engine.position, result.best_move);
            }
        }

        let line = match lines.recv_timeout(SEARCH_POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if engine.debug {
            debug!("received command: {}", line);
        }

        if line == "isready" {
            if let Some(handle) = pending.take() {
                flush_info(&handle, &engine);
                let (tt, _) = handle.join();
                engine.tt = tt;
            }
            println!("readyok");
            io::stdout().flush()?;
            continue;
        }

        if line == "quit" || starts_a_new_search(line) {
            if let Some(handle) = pending.take() {
                handle.request_stop();
                flush_info(&handle, &engine);
                let (tt, result) = handle.join();
                engine.tt = tt;
                emit_bestmove(&engine.position, result.best_move);
            }
        }
        if line == "quit" {
            break;
        }

        dispatch(line, &mut engine, &mut pending);
    }

    if let Some(handle) = pending.take() {
        handle.request_stop();
        let (_, result) = handle.join();
        emit_bestmove(&engine.position, result.best_move);
    }
    Ok(())
}

/// Spawns the dedicated stdin-reading thread and returns the receiving
/// end of the channel it feeds. The channel disconnects (and `recv`
/// starts returning `Disconnected`) once stdin hits EOF.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn starts_a_new_search(line: &str) -> bool {
    line == "stop" || line.starts_with("go") || line.starts_with("position") || line == "ucinewgame"
}

fn dispatch(line: &str, engine: &mut Engine, pending: &mut Option<SearchHandle>) {
    let mut tokens = line.split_whitespace();
    let command = match tokens.next() {
        Some(c) => c,
        None => return,
    };
    let rest: Vec<&str> = tokens.collect();

    match command {
        "uci" => {
            println!("id name sohilbot");
            println!("id author Sohil Shah");
            println!("option name MultiPV type spin default 1 min 1 max {}", MAX_MULTIPV);
            println!("uciok");
        }
        "ucinewgame" => {
            engine.position = Position::start();
            engine.tt.clear();
        }
        "debug" => {
            engine.debug = matches!(rest.first(), Some(&"on"));
        }
        "position" => handle_position(&rest, engine),
        "go" => handle_go(&rest, engine, pending),
        "stop" => { /* handled by the caller before reaching here */ }
        "setoption" => handle_setoption(&rest, engine),
        "perft" => handle_perft(&rest, engine),
        "eval" => handle_eval(engine),
        "moves" | "captures" => handle_list_moves(engine, command == "captures"),
        "test" => handle_test(engine),
        _ => log::warn!("{}", UciError::UnknownCommand(line.to_string())),
    }
    let _ = io::stdout().flush();
}

fn handle_position(args: &[&str], engine: &mut Engine) {
    let moves_idx = args.iter().position(|&a| a == "moves");
    let setup = &args[..moves_idx.unwrap_or(args.len())];

    engine.position = match setup.first() {
        Some(&"startpos") => Position::start(),
        Some(&"fen") => {
            let fen = setup[1..].join(" ");
            match Position::from_fen(&fen).map_err(UciError::from) {
                Ok(p) => p,
                Err(e) => {
                    log::error!("bad FEN in position command: {}", e);
                    return;
                }
            }
        }
        _ => return,
    };

    if let Some(idx) = moves_idx {
        for mv_text in &args[idx + 1..] {
            if let Err(e) = apply_move_text(&mut engine.position, mv_text) {
                log::warn!("{}", e);
            }
        }
    }
}

/// Parses and applies one UCI move against the current position,
/// matching it against the legal move list to recover its
/// classification flags. A move not found in that list is an illegal
/// move from the collaborator (§7 error kind 2): it is rejected and
/// the position is left unchanged.
fn apply_move_text(position: &mut Position, text: &str) -> Result<(), UciError> {
    let (from, to, promotion) =
        parse_uci_move(text).ok_or_else(|| UciError::BadMoveText(text.to_string()))?;
    let mut moves = Vec::new();
    position.generate(&mut moves, false);
    match moves.into_iter().find(|m| m.same_move(from, to, promotion)) {
        Some(mv) => {
            position.apply(mv);
            Ok(())
        }
        None => Err(UciError::IllegalMove(text.to_string())),
    }
}

fn handle_setoption(args: &[&str], engine: &mut Engine) {
    // "name MultiPV value N"
    if args.first() == Some(&"name") && args.get(1) == Some(&"MultiPV") {
        if let Some(&value_token) = args.get(2) {
            let n: usize = if value_token == "value" {
                args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1)
            } else {
                value_token.parse().unwrap_or(1)
            };
            engine.options.multi_pv = n.clamp(1, MAX_MULTIPV);
        }
    }
}

fn handle_go(args: &[&str], engine: &mut Engine, pending: &mut Option<SearchHandle>) {
    let mut max_depth = crate::search::MAX_DEPTH as i32;
    let mut movetime = None;
    let mut infinite = false;
    let mut wtime = None;
    let mut btime = None;
    let mut winc = 0u64;
    let mut binc = 0u64;

    let mut iter = args.iter().peekable();
    while let Some(&token) = iter.next() {
        match token {
            "depth" => max_depth = iter.next().and_then(|s| s.parse().ok()).unwrap_or(max_depth),
            "movetime" => movetime = iter.next().and_then(|s| s.parse().ok()),
            "infinite" => infinite = true,
            "wtime" => wtime = iter.next().and_then(|s| s.parse().ok()),
            "btime" => btime = iter.next().and_then(|s| s.parse().ok()),
            "winc" => winc = iter.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            "binc" => binc = iter.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            _ => {}
        }
    }

    let budget = if let Some(ms) = movetime {
        Duration::from_millis(ms)
    } else if infinite {
        crate::search::INFINITE_TIMELIMIT
    } else {
        let (time_left, inc) = if engine.position.to_move() == crate::basetypes::WHITE {
            (wtime, winc)
        } else {
            (btime, binc)
        };
        match time_left {
            Some(t) => {
                let budget_ms = (t / 50).saturating_add(inc).saturating_sub(
                    crate::search::TIME_BUFFER.as_millis() as u64,
                );
                Duration::from_millis(budget_ms.max(1))
            }
            None => crate::search::INFINITE_TIMELIMIT,
        }
    };

    let limits = SearchLimits { max_depth, movetime: budget };
    let tt = std::mem::replace(&mut engine.tt, TranspositionTable::new(engine.tt_size_log2));
    *pending = Some(SearchHandle::spawn(engine.position.clone(), tt, limits, engine.options));
}

fn handle_perft(args: &[&str], engine: &Engine) {
    let depth: u32 = args.first().and_then(|s| s.parse().ok()).unwrap_or(1);
    let counts = perft::perft(&engine.position, depth);
    println!(
        "perft {}: nodes={} captures={} en_passants={} castles={} promotions={} checks={} mates={}",
        depth, counts.nodes, counts.captures, counts.en_passants, counts.castles, counts.promotions,
        counts.checks, counts.mates
    );
}

fn handle_eval(engine: &Engine) {
    let score = eval::evaluate(&engine.position);
    let phase = eval::phase(&engine.position);
    debug!("static eval: {} (phase={:.2})", score, phase);
}

fn handle_list_moves(engine: &Engine, captures_only: bool) {
    let mut moves = Vec::new();
    engine.position.generate(&mut moves, captures_only);
    let text: Vec<String> = moves.iter().map(Move::to_uci).collect();
    println!("{}", text.join(" "));
}

fn handle_test(engine: &Engine) {
    let scenarios: [(&str, u32, u64); 2] = [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4, 197_281),
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 1, 20),
    ];
    for (fen, depth, expected) in scenarios {
        let position = Position::from_fen(fen).unwrap();
        let nodes = perft::perft(&position, depth).nodes;
        let verdict = if nodes == expected { "pass" } else { "FAIL" };
        info!("perft depth {} from {:?}: {} nodes ({})", depth, fen, nodes, verdict);
    }
    let _ = engine;
}

fn flush_info(handle: &SearchHandle, _engine: &Engine) {
    for msg in handle.poll_info() {
        print_info(&msg);
    }
}

fn print_info(msg: &InfoMessage) {
    let nps = if msg.time.as_millis() > 0 {
        (msg.nodes as u128 * 1000) / msg.time.as_millis()
    } else {
        0
    };
    let score_field = if msg.line.score.abs() > eval::mate_score(crate::search::MAX_DEPTH as i32) {
        let mate_in = eval::KING_VALUE - msg.line.score.abs();
        let sign = if msg.line.score > 0 { 1 } else { -1 };
        format!("mate {}", sign * mate_in)
    } else {
        format!("cp {}", msg.line.score)
    };
    let pv: Vec<String> = msg.line.moves.iter().map(Move::to_uci).collect();
    println!(
        "info score {} depth {} seldepth {} nodes {} time {} nps {} multipv {} pv {}",
        score_field,
        msg.depth,
        msg.seldepth,
        msg.nodes,
        msg.time.as_millis(),
        nps,
        msg.multipv,
        pv.join(" ")
    );
}

fn emit_bestmove(position: &Position, mv: Move) {
    let mv = if mv.is_valid() { mv } else { fallback_move(position) };
    if mv.is_valid() {
        println!("bestmove {}", mv.to_uci());
    } else {
        println!("bestmove 0000");
    }
    let _ = io::stdout().flush();
}
