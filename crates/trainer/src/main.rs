//! CLI trainer: configure the abstraction, build the initial state
//! template, then load -> run -> save the infoset table.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use gto_solver_core::{
    ActionAbstraction, CfrEngine, Deck, GameState, TrainingConfig,
};

#[derive(Parser)]
#[command(name = "gto-solver-trainer")]
#[command(about = "Train no-limit hold'em strategies with vanilla CFR")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CFR iterations and persist the infoset table
    Train {
        /// Path to a YAML config file (defaults to the stock heads-up game)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured iteration count
        #[arg(short, long)]
        iterations: Option<u64>,
        /// Override the configured infoset file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print strategies from a saved infoset table
    Inspect {
        /// Infoset table file
        #[arg(short, long)]
        file: PathBuf,
        /// Maximum number of infosets to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train {
            config,
            iterations,
            output,
        } => train(config, iterations, output),
        Commands::Inspect { file, limit } => inspect(&file, limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn train(
    config_path: Option<PathBuf>,
    iterations_override: Option<u64>,
    output_override: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut config = match config_path {
        Some(path) => TrainingConfig::load(&path)?,
        None => {
            log::info!("no config given; using the stock heads-up setup");
            TrainingConfig::default()
        }
    };
    if let Some(iterations) = iterations_override {
        config.training.iterations = iterations;
    }
    if let Some(output) = output_override {
        config.training.infoset_path = output;
    }

    let game = &config.game;
    let deck = match config.training.seed {
        Some(seed) => Deck::with_seed(seed),
        None => Deck::new(),
    };
    let mut template = GameState::with_deck(
        game.num_players,
        game.initial_stack,
        game.ante,
        game.button_pos,
        game.big_blind,
        deck,
    )?;

    let abstraction = ActionAbstraction::new(config.abstraction.clone());
    let mut engine = CfrEngine::new(abstraction);

    let infoset_path = &config.training.infoset_path;
    if engine.load_infosets(infoset_path)? {
        log::info!(
            "warm start: {} infosets from {}",
            engine.num_infosets(),
            infoset_path.display()
        );
    } else {
        log::info!("no previous table at {}; cold start", infoset_path.display());
    }

    let iterations = config.training.iterations;
    let progress = ProgressBar::new(iterations);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} iterations ({eta})",
        )?
        .progress_chars("=>-"),
    );

    let start = Instant::now();
    let chunk = (iterations / 100).max(1);
    let mut done = 0u64;
    while done < iterations {
        let step = chunk.min(iterations - done);
        engine.run_iterations(&mut template, step)?;
        done += step;
        progress.set_position(done);
    }
    progress.finish_and_clear();

    let elapsed = start.elapsed();
    log::info!(
        "trained {iterations} iterations in {:.2}s; {} infosets",
        elapsed.as_secs_f64(),
        engine.num_infosets()
    );

    if engine.num_infosets() == 0 {
        log::warn!("infoset table is empty; skipping save");
    } else {
        engine.save_infosets(infoset_path)?;
        log::info!("saved infoset table to {}", infoset_path.display());
    }

    preview_strategies(&engine, 5);
    Ok(())
}

fn inspect(file: &PathBuf, limit: usize) -> Result<(), Box<dyn Error>> {
    let mut engine = CfrEngine::new(ActionAbstraction::default());
    if !engine.load_infosets(file)? {
        return Err(format!("infoset file {} not found", file.display()).into());
    }
    println!(
        "{} infosets in {}",
        engine.num_infosets(),
        file.display()
    );
    preview_strategies(&engine, limit);
    Ok(())
}

/// Print the most-visited infosets with their average strategies.
fn preview_strategies(engine: &CfrEngine, limit: usize) {
    let mut nodes: Vec<_> = engine.infosets().values().collect();
    nodes.sort_by(|a, b| b.visit_count.cmp(&a.visit_count).then(a.key.cmp(&b.key)));

    for node in nodes.iter().take(limit) {
        let Some(strategy) = engine.average_strategy(&node.key) else {
            continue;
        };
        let rendered: Vec<String> = strategy
            .iter()
            .enumerate()
            .map(|(i, p)| format!("A{i}:{p:.3}"))
            .collect();
        let key = if node.key.len() > 60 {
            format!("{}…", &node.key[..57])
        } else {
            node.key.clone()
        };
        println!(
            "  [{key}] visits={} avg: {}",
            node.visit_count,
            rendered.join(" ")
        );
    }
    if nodes.len() > limit {
        println!("  … and {} more infosets", nodes.len() - limit);
    }
}
