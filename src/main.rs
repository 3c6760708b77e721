//! Process entry point. Everything UCI-protocol-shaped lives in
//! `uci::run`; this file only owns process startup configuration that
//! is not itself part of the protocol (log verbosity, TT size).

use clap::Parser;
use sohilbot::tt;

/// UCI-compatible chess engine core (position, move generator,
/// evaluator, transposition table, alpha-beta search).
#[derive(Parser, Debug)]
#[command(name = "sohilbot", about, version)]
struct Cli {
    /// Log level for diagnostics written to stderr (stdout is
    /// reserved for the UCI protocol). Overrides RUST_LOG if set.
    #[arg(long)]
    log_level: Option<String>,

    /// Transposition table size as log2 of the entry count.
    #[arg(long, conflicts_with = "tt_mb")]
    tt_size_log2: Option<u32>,

    /// Transposition table size in megabytes, rounded down to the
    /// nearest power-of-two entry count. A friendlier alternative to
    /// `--tt-size-log2`.
    #[arg(long)]
    tt_mb: Option<u64>,
}

impl Cli {
    fn tt_size_log2(&self) -> u32 {
        if let Some(log2) = self.tt_size_log2 {
            return log2;
        }
        if let Some(mb) = self.tt_mb {
            let entry_size = std::mem::size_of::<tt::TTEntry>().max(1) as u64;
            let entries = (mb * 1024 * 1024 / entry_size).max(1);
            return 63 - entries.leading_zeros() as u32;
        }
        tt::DEFAULT_SIZE_LOG2
    }
}

fn main() {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = &cli.log_level {
        builder.parse_filters(level);
    }
    builder.init();

    if let Err(err) = sohilbot::uci::run(cli.tt_size_log2()) {
        log::error!("fatal I/O error: {}", err);
        std::process::exit(1);
    }
}
