//! santa-runner: headless arrangement runner.
//!
//! Usage:
//!   santa-runner --history history.json --seed 2025 --iterations 20000
//!   santa-runner --db santa.db --config santa.json --apply
//!   santa-runner --history history.json --participants Ann,Bob,Cat --count

use anyhow::{Context, Result};
use santa_core::{
    best_arrangement, config::SantaConfig, optimal_arrangement_count, render_arrangement,
    store::SantaStore, types::ParticipantId, HistoryStore, Seed,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match arg_value(&args, "--config") {
        Some(path) => SantaConfig::load(path)?,
        None => SantaConfig::default(),
    };
    if let Some(seed) = arg_value(&args, "--seed") {
        config.seed = parse_seed(seed);
    }
    config.iterations = parse_arg(&args, "--iterations", config.iterations);
    let count_mode = args.iter().any(|a| a == "--count");
    let apply = args.iter().any(|a| a == "--apply");
    let db = arg_value(&args, "--db");

    let store = match db {
        Some(path) => {
            let store = SantaStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    let history = load_history(&args, &config, store.as_ref())?;
    let participants: Vec<ParticipantId> = match arg_value(&args, "--participants") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => history.participants().map(String::from).collect(),
    };

    println!("santa-runner");
    println!("  seed:          {}", config.seed);
    println!("  iterations:    {}", config.iterations);
    println!("  participants:  {}", participants.len());
    println!("  history years: {}", history.number_of_years());
    println!();

    let outcome = best_arrangement(
        config.seed.clone(),
        config.iterations,
        &config.policy,
        &participants,
        &history,
    )?;

    print!("{}", render_arrangement(&outcome.arrangement, &history, Some(&config.policy)));
    println!();
    println!("=== SEARCH SUMMARY ===");
    println!("  iterations run: {}", outcome.iterations_run);
    println!("  found at:       {}", outcome.found_at_iteration);
    println!("  improvements:   {}", outcome.improvements);
    println!("  optimal:        {}", outcome.is_optimal());

    if count_mode {
        let optimal = optimal_arrangement_count(
            config.seed.clone(),
            config.iterations,
            &config.policy,
            &participants,
            &history,
        )?;
        println!("  optimal count:  {optimal} / {}", config.iterations);
    }

    if apply {
        let store = store.context("--apply requires --db")?;
        let run_id = uuid::Uuid::new_v4().to_string();
        store.apply_round(
            &run_id,
            &config.seed,
            config.iterations,
            env!("CARGO_PKG_VERSION"),
            &history,
            &outcome,
        )?;
        println!("  applied as:     {run_id}");
    }

    Ok(())
}

/// History comes from the database when it has any, then the JSON grid
/// file, then nothing.
fn load_history(
    args: &[String],
    config: &SantaConfig,
    store: Option<&SantaStore>,
) -> Result<HistoryStore> {
    if let Some(store) = store {
        let history = store.load_history()?;
        if !history.is_empty() {
            return Ok(history);
        }
    }
    match arg_value(args, "--history") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            let rows: Vec<Vec<String>> = serde_json::from_str(&content)
                .with_context(|| format!("Cannot parse {path} as a grid of strings"))?;
            Ok(HistoryStore::from_rows(&rows, &config.no_participation_marker)?)
        }
        None => {
            log::warn!("No history supplied; every arrangement starts fresh");
            Ok(HistoryStore::new())
        }
    }
}

fn parse_seed(raw: &str) -> Seed {
    raw.parse::<i64>().map_or_else(|_| Seed::from(raw), Seed::from)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
