//! Drives the compiled binary as a real UCI engine over stdin/stdout,
//! exercising the protocol surface described in the specification's
//! end-to-end scenarios rather than calling internal functions
//! directly.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn spawn_engine() -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_sohilbot"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn engine binary")
}

fn send(child: &mut std::process::Child, line: &str) {
    writeln!(child.stdin.as_mut().unwrap(), "{}", line).unwrap();
}

/// Reads stdout lines until one satisfies `predicate` or `timeout`
/// elapses, returning the matching line.
fn read_until(
    reader: &mut impl BufRead,
    predicate: impl Fn(&str) -> bool,
    timeout: Duration,
) -> Option<String> {
    let deadline = Instant::now() + timeout;
    let mut line = String::new();
    while Instant::now() < deadline {
        line.clear();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return None;
        }
        let trimmed = line.trim();
        if predicate(trimmed) {
            return Some(trimmed.to_string());
        }
    }
    None
}

#[test]
fn uci_handshake() {
    let mut child = spawn_engine();
    send(&mut child, "uci");
    let mut out = BufReader::new(child.stdout.take().unwrap());
    let line = read_until(&mut out, |l| l == "uciok", Duration::from_secs(5));
    assert_eq!(line.as_deref(), Some("uciok"));
    send(&mut child, "quit");
    child.wait().unwrap();
}

#[test]
fn isready_answers_without_a_pending_search() {
    let mut child = spawn_engine();
    send(&mut child, "isready");
    let mut out = BufReader::new(child.stdout.take().unwrap());
    let line = read_until(&mut out, |l| l == "readyok", Duration::from_secs(5));
    assert_eq!(line.as_deref(), Some("readyok"));
    send(&mut child, "quit");
    child.wait().unwrap();
}

#[test]
fn depth_search_returns_a_legal_bestmove() {
    let mut child = spawn_engine();
    send(&mut child, "ucinewgame");
    send(&mut child, "position startpos moves e2e4 e7e5 g1f3");
    send(&mut child, "go depth 4");
    let mut out = BufReader::new(child.stdout.take().unwrap());
    let line = read_until(&mut out, |l| l.starts_with("bestmove"), Duration::from_secs(30));
    let line = line.expect("no bestmove line within timeout");
    let mv = line.split_whitespace().nth(1).expect("bestmove line has no move");
    assert!(mv.len() == 4 || mv.len() == 5, "malformed move text: {}", mv);
    send(&mut child, "quit");
    child.wait().unwrap();
}

#[test]
fn stop_returns_bestmove_promptly() {
    let mut child = spawn_engine();
    send(&mut child, "position startpos");
    send(&mut child, "go movetime 5000");
    std::thread::sleep(Duration::from_millis(150));
    let started = Instant::now();
    send(&mut child, "stop");
    let mut out = BufReader::new(child.stdout.take().unwrap());
    let line = read_until(&mut out, |l| l.starts_with("bestmove"), Duration::from_secs(3));
    assert!(line.is_some(), "no bestmove line after stop");
    assert!(started.elapsed() < Duration::from_secs(3), "bestmove came too late after stop");
    send(&mut child, "quit");
    child.wait().unwrap();
}

#[test]
fn perft_command_matches_canonical_startpos_count() {
    let mut child = spawn_engine();
    send(&mut child, "perft 3");
    let mut out = BufReader::new(child.stdout.take().unwrap());
    let line = read_until(&mut out, |l| l.starts_with("perft"), Duration::from_secs(10));
    let line = line.expect("no perft output");
    assert!(line.contains("nodes=8902"), "unexpected perft line: {}", line);
    send(&mut child, "quit");
    child.wait().unwrap();
}
