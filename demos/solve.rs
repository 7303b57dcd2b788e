//! Solves one P||Cmax instance and prints the result.
//!
//! ```text
//! cargo run --release --example solve -- [instance.txt]
//! ```
//!
//! Without a file a generated instance with a known optimum is used.
//! Tunables come from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PCMAX_THREADS` | 8 |
//! | `PCMAX_POPULATION` | 32 |
//! | `PCMAX_SURVIVORS` | 6 |
//! | `PCMAX_BUDGET_MS` | 2000 |
//! | `PCMAX_SEED` | random |
//! | `PCMAX_HEURISTIC` | `lpt` (`greedy`, `lpt`, `round_robin`) |
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::env;
use std::error::Error;
use std::fs;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use u_pcmax::construction::rules::{Greedy, Lpt, RoundRobin};
use u_pcmax::construction::ConstructionHeuristic;
use u_pcmax::generator;
use u_pcmax::kpi::SolutionKpi;
use u_pcmax::models::ProblemInstance;
use u_pcmax::search::{CandidateSolution, Engine, EngineConfig};

fn cfg_usize(env_key: &str, default: usize) -> usize {
    env::var(env_key)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

fn cfg_u64(env_key: &str) -> Option<u64> {
    env::var(env_key).ok().and_then(|s| s.parse::<u64>().ok())
}

fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn heuristic() -> Box<dyn ConstructionHeuristic> {
    match env::var("PCMAX_HEURISTIC").as_deref() {
        Ok("greedy") => Box::new(Greedy),
        Ok("round_robin") => Box::new(RoundRobin),
        _ => Box::new(Lpt),
    }
}

fn load_instance(seed: u64) -> Result<ProblemInstance, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => Ok(fs::read_to_string(path)?.parse()?),
        None => {
            let mut rng = SmallRng::seed_from_u64(seed);
            Ok(generator::generate(120, 64, 6, 40, &mut rng)?)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();

    let seed = cfg_u64("PCMAX_SEED").unwrap_or_else(rand::random);
    let instance = load_instance(seed)?;
    let heuristic = heuristic();

    let config = EngineConfig::default()
        .with_threads(cfg_usize("PCMAX_THREADS", 8))
        .with_population(cfg_usize("PCMAX_POPULATION", 32))
        .with_survivors(cfg_usize("PCMAX_SURVIVORS", 6))
        .with_time_budget(Duration::from_millis(
            cfg_u64("PCMAX_BUDGET_MS").unwrap_or(2_000),
        ))
        .with_seed(seed);

    let engine = Engine::new(config);
    let report = |best: &CandidateSolution| {
        tracing::trace!(makespan = best.makespan(), "progress");
    };

    tracing::info!(
        tasks = instance.task_count(),
        processors = instance.processors_count(),
        heuristic = heuristic.name(),
        seed,
        "solving"
    );
    let outcome = engine.run(instance, heuristic.as_ref(), &report)?;

    println!(
        "makespan {} (seed {}) in {:.2?}, {} cycles, stopped: {}",
        outcome.makespan(),
        outcome.stats.seed_makespan,
        outcome.elapsed,
        outcome.stats.cycles,
        outcome.termination
    );
    for (p, tasks) in outcome.best.processors().iter().enumerate() {
        println!("P{p:<3} load {:>6}  tasks {:?}", outcome.best.processor_loads()[p], tasks);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&SolutionKpi::calculate(&outcome.best))?
    );
    Ok(())
}
