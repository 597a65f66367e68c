//! Headless driver: evolves a population and logs each generation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use snake_evo::simulation::history::GenerationRecord;
use snake_evo::simulation::params::Params;
use snake_evo::simulation::population::Population;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "snake-evo")]
#[command(version)]
#[command(about = "Evolves neural-network snakes with a genetic algorithm")]
struct Cli {
    /// Number of generations to complete
    #[arg(short, long, default_value = "100")]
    generations: u32,

    /// Parameter file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Snapshot to resume from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where to write a snapshot when done
    #[arg(long)]
    save: Option<PathBuf>,

    /// Ticks after which a generation is ended by force
    #[arg(long, default_value = "100000")]
    max_ticks: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => Params::default(),
    };
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }

    let mut population = Population::new(params).context("failed to create population")?;
    if let Some(path) = &cli.load {
        population
            .load_from_file(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?;
        info!(generation = population.generation(), "resumed from snapshot");
    }

    population.subscribe(Box::new(|record: &GenerationRecord| {
        debug!(?record, "generation record");
    }));

    info!(
        snakes = population.snakes().len(),
        generations = cli.generations,
        "starting evolution"
    );

    for _ in 0..cli.generations {
        run_generation(&mut population, cli.max_ticks)?;
    }

    info!(
        best_fitness = population.best_fitness(),
        best_length = population.best_length(),
        "evolution finished"
    );

    if let Some(path) = &cli.save {
        population
            .save_to_file(path)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
        info!(path = %path.display(), "saved snapshot");
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Ticks until the current generation ends, forcing the end after `max_ticks`.
fn run_generation(population: &mut Population, max_ticks: u64) -> Result<()> {
    for _ in 0..max_ticks {
        if population.tick()?.is_some() {
            return Ok(());
        }
    }
    warn!(
        generation = population.generation(),
        live = population.live_count(),
        "tick limit reached, ending generation"
    );
    population.transition()?;
    Ok(())
}
