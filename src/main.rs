//! Headless Match Runner
//!
//! Runs agent vs agent matches and reports the outcome as text or JSON,
//! optionally recording a replay file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use arena_grid::agent::{AgentPolicy, HeuristicAgent, RandomAgent};
use arena_grid::core::config::MatchConfig;
use arena_grid::core::error::Result;
use arena_grid::engine::runner::{Match, MatchObserver, MatchReport};
use arena_grid::replay::ReplayRecorder;

#[derive(Parser, Debug)]
#[command(name = "arena-grid")]
#[command(about = "Run agent vs agent grid battles and report the outcome")]
struct Args {
    /// Ruleset preset to play under
    #[arg(long, value_enum, default_value_t = ModeArg::World)]
    mode: ModeArg,

    /// TOML config file; overrides --mode
    #[arg(long)]
    config: Option<PathBuf>,

    /// Blue agent policy
    #[arg(long, value_enum, default_value_t = AgentArg::Heuristic)]
    blue: AgentArg,

    /// Red agent policy
    #[arg(long, value_enum, default_value_t = AgentArg::Heuristic)]
    red: AgentArg,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the preset's turn limit
    #[arg(long)]
    max_turns: Option<u32>,

    /// Record a replay JSON file
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Output format for the final report
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Enable verbose per-turn logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Classic,
    World,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AgentArg {
    Heuristic,
    Random,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult<'a> {
    #[serde(flatten)]
    report: &'a MatchReport,
    mode: &'a str,
    seed: u64,
}

fn build_agent(kind: AgentArg, seed: u64) -> Box<dyn AgentPolicy> {
    match kind {
        AgentArg::Heuristic => Box::new(HeuristicAgent::new()),
        AgentArg::Random => Box::new(RandomAgent::new(seed)),
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::from_toml_file(path)?,
        None => match args.mode {
            ModeArg::Classic => MatchConfig::classic(),
            ModeArg::World => MatchConfig::world(),
        },
    };
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    // Distinct streams so the engine and a random agent never share draws
    let blue = build_agent(args.blue, seed.wrapping_add(1));
    let red = build_agent(args.red, seed.wrapping_add(2));

    let mut game = Match::new(&config, blue, red, seed)?;
    let mut recorder = ReplayRecorder::new();
    let mut observers: Vec<&mut dyn MatchObserver> = Vec::new();
    if args.replay.is_some() {
        observers.push(&mut recorder);
    }
    let report = game.run(&mut observers);

    if let Some(path) = &args.replay {
        recorder.save_json(path, &report)?;
        eprintln!("replay written to {}", path.display());
    }

    match args.format {
        FormatArg::Json => {
            let result = RunResult {
                report: &report,
                mode: config.mode.label(),
                seed,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        FormatArg::Text => {
            println!("{} | seed {}", config.mode.label(), seed);
            for event in game.event_log().iter().rev().take(5).rev() {
                println!("  {}", event.description);
            }
            let outcome = match report.winner {
                Some(side) => format!("{} wins", side.name()),
                None => "draw".to_string(),
            };
            println!(
                "{} by {} after {} turns (Blue {} - Red {})",
                outcome, report.reason, report.turns_played, report.scores[0], report.scores[1]
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
