//! Gridsearch -- a grid-territory engine speaking JSON lines.
//!
//! Reads one turn document per stdin line and writes one action submission
//! per stdout line. By default each line is a `Snapshot`; with `--player`
//! each line is a full match document and the snapshot for that player is
//! extracted first. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};

use gridsearch::config::{ConfigError, SearchConfig};
use gridsearch::engine::Orchestrator;
use gridsearch::eval::Heuristic;
use gridsearch::logger::init_logger;
use gridsearch::protocol::{MatchView, Snapshot, SnapshotError};
use gridsearch::search::PolicyKind;

#[derive(Parser, Debug)]
#[command(name = "gridsearch")]
#[command(about = "Decide grid-territory turns from JSON snapshots on stdin")]
struct Args {
    /// JSON search configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Action policy (random, greedy or beam)
    #[arg(long)]
    policy: Option<PolicyKind>,

    /// States kept per beam level
    #[arg(long)]
    beam_width: Option<usize>,

    /// Beam levels to expand
    #[arg(long)]
    beam_depth: Option<usize>,

    /// State evaluation (game_score or enclosure)
    #[arg(long)]
    heuristic: Option<Heuristic>,

    /// RNG seed, 0 for entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Expand beam levels in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Treat input lines as match documents and play as this player index
    #[arg(long)]
    player: Option<usize>,

    /// Mark submissions as dry runs
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Log level for stderr output
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn search_config(args: &Args) -> Result<SearchConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(width) = args.beam_width {
        config.beam_width = width;
    }
    if let Some(depth) = args.beam_depth {
        config.beam_depth = depth;
    }
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.parallel |= args.parallel;
    Ok(config)
}

/// Parses one input line into the snapshot to act on. `Ok(None)` means the
/// line describes a match that is not in play.
fn read_snapshot(line: &str, player: Option<usize>) -> Result<Option<Snapshot>, SnapshotError> {
    let Some(player) = player else {
        return Snapshot::from_json(line).map(Some);
    };
    let view = MatchView::from_json(line)?;
    if view.is_ended() || !view.is_started() {
        info!(status = ?view.status, "match not in play, skipping");
        return Ok(None);
    }
    view.snapshot_for(player).map(Some)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.log_level) {
        eprintln!("failed to install logger: {}", e);
    }

    let config = match search_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(?config, "starting");

    let mut orchestrator = Orchestrator::new(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("failed to read stdin: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let snapshot = match read_snapshot(line, args.player) {
            Ok(Some(s)) => s,
            Ok(None) => continue,
            Err(e) => {
                warn!("rejected input: {}", e);
                continue;
            }
        };

        let mut submission = match orchestrator.handle_snapshot(&snapshot) {
            Ok(s) => s,
            Err(e) => {
                warn!("rejected snapshot: {}", e);
                continue;
            }
        };
        submission.dry_run = args.dry_run;

        let written = submission
            .to_json()
            .map_err(io::Error::from)
            .and_then(|json| writeln!(out, "{}", json))
            .and_then(|_| out.flush());
        if let Err(e) = written {
            error!("failed to write submission: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
