//! Seeded playout CLI.
//!
//! Plays self-contained games on random boards and writes one JSON record
//! per game. With `--show` the games run one at a time and every board is
//! rendered to stderr as it is played.
//!
//! Usage:
//!   cargo run --release --bin playout -- --games 20 --policy beam --threads 4

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, Level};

use gridsearch::board::BoardParams;
use gridsearch::config::SearchConfig;
use gridsearch::eval::Heuristic;
use gridsearch::logger::init_logger;
use gridsearch::playout::{self, GameRecord, PlayoutConfig, PlayoutError};
use gridsearch::search::PolicyKind;

#[derive(Parser, Debug)]
#[command(name = "playout")]
#[command(about = "Play seeded grid-territory games with a search policy")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 10)]
    games: usize,

    /// Board width
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Board height
    #[arg(long, default_value_t = 3)]
    height: usize,

    /// Turns per game
    #[arg(long, default_value_t = 4)]
    turns: u32,

    /// Agents per board
    #[arg(long, default_value_t = 1)]
    agents: usize,

    /// Board seed of the first game, 0 for entropy
    #[arg(long, default_value_t = 121322)]
    seed: u64,

    /// Parallel threads for concurrent games
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// JSON search configuration; search flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Action policy (random, greedy or beam)
    #[arg(long)]
    policy: Option<PolicyKind>,

    #[arg(long)]
    beam_width: Option<usize>,

    #[arg(long)]
    beam_depth: Option<usize>,

    /// State evaluation (game_score or enclosure)
    #[arg(long)]
    heuristic: Option<Heuristic>,

    /// Policy RNG seed, 0 for entropy
    #[arg(long)]
    search_seed: Option<u64>,

    /// Render every board state to stderr
    #[arg(long, default_value_t = false)]
    show: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress the summary
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Args {
    fn playout_config(&self) -> Result<PlayoutConfig, Box<dyn std::error::Error>> {
        let mut search = match &self.config {
            Some(path) => SearchConfig::from_json_file(path)?,
            None => SearchConfig::default(),
        };
        if let Some(policy) = self.policy {
            search.policy = policy;
        }
        if let Some(width) = self.beam_width {
            search.beam_width = width;
        }
        if let Some(depth) = self.beam_depth {
            search.beam_depth = depth;
        }
        if let Some(heuristic) = self.heuristic {
            search.heuristic = heuristic;
        }
        if let Some(seed) = self.search_seed {
            search.seed = seed;
        }
        Ok(PlayoutConfig {
            games: self.games,
            seed: self.seed,
            threads: self.threads,
            board: BoardParams {
                width: self.width,
                height: self.height,
                total_turns: self.turns,
                agents: self.agents,
            },
            search,
        })
    }
}

/// Plays the batch sequentially, printing each state as it happens.
fn show_playouts(config: &PlayoutConfig) -> Result<Vec<GameRecord>, PlayoutError> {
    let mut games = Vec::with_capacity(config.games);
    for (i, seed) in playout::board_seeds(config).into_iter().enumerate() {
        eprintln!("== game {} (seed {}) ==", i, seed);
        let game = playout::play_game_with(config, i, seed, |state| eprintln!("{}", state))?;
        games.push(game);
    }
    Ok(games)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.quiet { Level::WARN } else { args.log_level };
    if let Err(e) = init_logger(level) {
        eprintln!("failed to install logger: {}", e);
    }

    let config = match args.playout_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        games = config.games,
        threads = config.threads,
        policy = ?config.search.policy,
        "playout"
    );

    let start = Instant::now();
    let result = if args.show {
        show_playouts(&config)
    } else {
        playout::run_playouts(&config)
    };
    let games = match result {
        Ok(g) => g,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    if let Some(summary) = playout::summarize(&games) {
        info!(
            games = summary.games,
            mean = format_args!("{:.2}", summary.mean_score),
            best = summary.best_score,
            worst = summary.worst_score,
            secs = format_args!("{:.2}", elapsed.as_secs_f64()),
            "completed"
        );
    }

    let written = match &args.output {
        Some(path) => File::create(path)
            .and_then(|file| playout::write_jsonl(&games, &mut BufWriter::new(file))),
        None => playout::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
