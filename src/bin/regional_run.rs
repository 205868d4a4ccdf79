//! Regional Simulation Runner
//!
//! Builds a synthetic farm population, runs the yearly Consumat decision
//! cycle against the scripted solver, and writes decision records as JSON
//! lines. Stands in for the external orchestration around a real
//! mathematical-programming solver.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use agrimind::activities::ActivityCatalog;
use agrimind::agent::{FarmAgent, FarmProductMatrix, IncomeHistory, Person};
use agrimind::core::config::{EngineConfig, Parameters};
use agrimind::core::types::FarmId;
use agrimind::decision::Strategy;
use agrimind::network::SocialNetwork;
use agrimind::simulation::{run_years, Region, ScriptedSolver};

/// Synthetic region run of the Consumat farm decision engine
#[derive(Parser, Debug)]
#[command(name = "regional_run")]
#[command(about = "Run a synthetic farm region through the yearly decision cycle")]
struct Args {
    /// Number of simulated years
    #[arg(long, default_value_t = 10)]
    years: u32,

    /// Number of farms in the region
    #[arg(long, default_value_t = 50)]
    farms: u32,

    /// Income memory length shared by all farms
    #[arg(long, default_value_t = 5)]
    memory: usize,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// TOML file with the Consumat parameter set (defaults otherwise)
    #[arg(long)]
    parameters: Option<PathBuf>,

    /// Where to write decision records as JSON lines
    #[arg(long, default_value = "decision_records.jsonl")]
    output: PathBuf,
}

const ACTIVITY_NAMES: [&str; 10] = [
    "wheat", "maize", "barley", "potatoes", "rapeseed", "dairy", "beef", "pigs", "poultry",
    "orchard",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let params: Parameters = match &args.parameters {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => Parameters::default(),
    };

    println!("Starting regional simulation");
    println!("============================");
    println!("Farms: {}, memory: {}, years: {}", args.farms, args.memory, args.years);
    println!("Parameter set: {}", params.name);
    println!();

    let mut region = build_region(&args, params)?;
    let mut solver = ScriptedSolver::new(region.catalog(), args.seed ^ 0x5eed);

    let outputs = run_years(&mut region, &mut solver, args.years)?;

    for output in &outputs {
        let mut repetition = 0;
        let mut imitation = 0;
        let mut deliberation = 0;
        let mut comparison = 0;
        for record in &output.records {
            match record.strategy {
                Strategy::Repetition => repetition += 1,
                Strategy::Imitation => imitation += 1,
                Strategy::Deliberation => deliberation += 1,
                Strategy::SocialComparison => comparison += 1,
            }
        }
        println!(
            "year {:>3}: repetition {:>3}  imitation {:>3}  deliberation {:>3}  social comparison {:>3}",
            output.year, repetition, imitation, deliberation, comparison
        );
    }

    let exited = region.agents().iter().filter(|a| a.exited).count();
    let mean_income: f64 = region
        .agents()
        .iter()
        .map(|a| a.history.latest())
        .sum::<f64>()
        / region.agents().len() as f64;

    println!();
    println!("Final mean income: {mean_income:.2}");
    println!("Exited farms: {exited} of {}", args.farms);
    println!("Regional income change rate: {:+.4}", region.regional_change());

    let mut lines = String::new();
    for output in &outputs {
        for record in &output.records {
            lines.push_str(&serde_json::to_string(record)?);
            lines.push('\n');
        }
    }
    fs::write(&args.output, lines)?;
    println!("Decision records written to {}", args.output.display());

    Ok(())
}

/// Generate a synthetic region from the seed: random preferences, burn-in
/// incomes around a common base, and a fully connected weighted network
fn build_region(args: &Args, params: Parameters) -> Result<Region, Box<dyn std::error::Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let catalog = ActivityCatalog::new(ACTIVITY_NAMES);
    let header = catalog.productive_names();
    let mut preferences = FarmProductMatrix::new(header.clone());
    let mut experience = FarmProductMatrix::new(header);
    let mut agents = Vec::with_capacity(args.farms as usize);

    for i in 0..args.farms {
        let id = FarmId(i);
        let pref_row: Vec<i32> = (0..ACTIVITY_NAMES.len())
            .map(|_| rng.gen_range(1..=5))
            .collect();
        let exp_row: Vec<i32> = (0..ACTIVITY_NAMES.len())
            .map(|_| rng.gen_range(0..=args.memory as i32))
            .collect();
        preferences.push_row(id, pref_row)?;
        experience.push_row(id, exp_row)?;

        let base = rng.gen_range(80.0..120.0);
        let incomes: Vec<f64> = (0..args.memory)
            .map(|_| base * (1.0 + rng.gen_range(-0.05..0.05)))
            .collect();

        let person = Person::new(
            rng.gen_range(30..65),
            rng.gen_range(1..=3),
            args.memory,
            rng.gen_range(0.0..1.0),
        );

        let edges: Vec<(FarmId, f64)> = (0..args.farms)
            .filter(|&j| j != i)
            .map(|j| (FarmId(j), rng.gen_range(0.0..1.0)))
            .collect();

        let start = catalog
            .resolve(ACTIVITY_NAMES[rng.gen_range(0..ACTIVITY_NAMES.len())])
            .expect("name from the master list");

        agents.push(FarmAgent::new(
            id,
            format!("Farm{:03}", i + 1),
            person,
            IncomeHistory::new(incomes),
            SocialNetwork::new(edges),
            vec![start],
        )?);
    }

    Ok(Region::new(
        catalog,
        params,
        EngineConfig::default(),
        preferences,
        experience,
        agents,
    )?)
}
