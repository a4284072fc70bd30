use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

mod config;
mod dosing;
mod error;
mod models;
mod output;
mod simulation;

use crate::config::Config;
use crate::dosing::{parse_dose_time, CounterDose, DoseEvent};
use crate::simulation::{InteractionEngine, InteractionInput, RecommenderPolicy};

#[derive(Parser)]
#[command(name = "pk_overlap")]
#[command(about = "Predict side-effect timing and counter-medication overlap")]
struct Cli {
    /// Primary drug name from the registry
    #[arg(long)]
    primary_drug: String,

    /// Primary dose time, e.g. "12/24 8am"
    #[arg(long)]
    primary_time: String,

    /// Side-effect name from the registry
    #[arg(short = 'e', long)]
    side_effect: String,

    /// Counter drug name from the registry
    #[arg(long, requires = "counter_time")]
    counter_drug: Option<String>,

    /// Counter dose time, e.g. "12/24 2pm"
    #[arg(long, requires = "counter_drug")]
    counter_time: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Year for month/day dose times (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Override the configured recommender policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Counter drug peaks as the side effect starts
    Onset,
    /// Counter drug peaks with the side effect
    Peak,
}

impl From<PolicyArg> for RecommenderPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Onset => RecommenderPolicy::AlignOnset,
            PolicyArg::Peak => RecommenderPolicy::AlignPeak,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("loading configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => {
            debug!("Using built-in configuration");
            Config::default()
        }
    };
    if let Some(policy) = cli.policy {
        config.recommender.policy = policy.into();
    }

    let input = build_input(&cli, &config)?;
    info!(
        "Primary {} ({} units, t1/2 {:.1} h) at {}, side effect '{}' ({})",
        input.primary.drug,
        input.primary.dose(),
        input.primary.params().half_life(),
        input.primary.time,
        cli.side_effect,
        input.side_effect.category()
    );

    let engine = InteractionEngine::new(config)?;
    let result = engine.run(&input)?;

    let rec = &result.recommendation;
    match rec.optimal_counter_time {
        Some(time) => info!(
            "Suggested counter dose at {} ({:.1}% coverage with chosen time)",
            time, rec.coverage_percent
        ),
        None => info!("No counter medication selected"),
    }

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(&cli.output)?;

    crate::output::save_results(&result, &cli.output)?;
    crate::output::generate_report(&result, &cli.output)?;
    info!("Results saved to {:?}", cli.output);

    Ok(())
}

/// Resolves names and dose times into engine input. Any failure here stops
/// the run before the engine is invoked.
fn build_input(cli: &Cli, config: &Config) -> anyhow::Result<InteractionInput> {
    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());
    let registry = &config.registry;

    let primary_profile = registry.drug(&cli.primary_drug)?;
    let primary_time = parse_dose_time(&cli.primary_time, year)?;
    let primary = DoseEvent::new(
        cli.primary_drug.trim().to_lowercase(),
        primary_profile.params()?,
        primary_profile.dose,
        primary_time,
    )
    .context("building primary dose")?;

    let side_effect = registry.side_effect(&cli.side_effect)?.clone();

    let counter = match (&cli.counter_drug, &cli.counter_time) {
        (Some(drug), Some(time)) => {
            let profile = registry.drug(drug)?;
            let event = DoseEvent::new(
                drug.trim().to_lowercase(),
                profile.params()?,
                profile.dose,
                parse_dose_time(time, year)?,
            )
            .context("building counter dose")?;
            Some(CounterDose::new(event, profile.t_max_hours)?)
        }
        _ => None,
    };

    Ok(InteractionInput {
        primary,
        side_effect,
        counter,
    })
}
