//! Determinism tests: identical seeds must reproduce identical runs
//!
//! The engine is RNG-free; the scripted solver and the fixture generator are
//! seeded. Two runs from the same seed must agree on every decision record,
//! including strategy choices and tie-broken imitation targets.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use agrimind::activities::ActivityCatalog;
use agrimind::agent::{FarmAgent, FarmProductMatrix, IncomeHistory, Person};
use agrimind::core::config::{EngineConfig, Parameters};
use agrimind::core::types::FarmId;
use agrimind::network::SocialNetwork;
use agrimind::simulation::{run_years, Region, ScriptedSolver, YearOutput};

const ACTIVITY_NAMES: [&str; 6] = ["wheat", "maize", "barley", "dairy", "pigs", "poultry"];

fn synthetic_region(seed: u64, farms: u32, memory: usize) -> Region {
    synthetic_region_with_config(seed, farms, memory, EngineConfig::default())
}

fn synthetic_region_with_config(
    seed: u64,
    farms: u32,
    memory: usize,
    config: EngineConfig,
) -> Region {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let catalog = ActivityCatalog::new(ACTIVITY_NAMES);
    let header = catalog.productive_names();
    let mut preferences = FarmProductMatrix::new(header.clone());
    let mut experience = FarmProductMatrix::new(header);
    let mut agents = Vec::new();

    for i in 0..farms {
        let id = FarmId(i);
        preferences
            .push_row(id, (0..ACTIVITY_NAMES.len()).map(|_| rng.gen_range(1..=5)).collect())
            .unwrap();
        experience
            .push_row(id, (0..ACTIVITY_NAMES.len()).map(|_| rng.gen_range(0..=3)).collect())
            .unwrap();

        let base = rng.gen_range(80.0..120.0);
        let incomes: Vec<f64> = (0..memory)
            .map(|_| base * (1.0 + rng.gen_range(-0.05..0.05)))
            .collect();

        let edges: Vec<(FarmId, f64)> = (0..farms)
            .filter(|&j| j != i)
            .map(|j| (FarmId(j), rng.gen_range(0.0..1.0)))
            .collect();

        let start = catalog
            .resolve(ACTIVITY_NAMES[rng.gen_range(0..ACTIVITY_NAMES.len())])
            .unwrap();

        agents.push(
            FarmAgent::new(
                id,
                format!("Farm{i}"),
                Person::new(rng.gen_range(30..65), 1, memory, rng.gen_range(0.0..1.0)),
                IncomeHistory::new(incomes),
                SocialNetwork::new(edges),
                vec![start],
            )
            .unwrap(),
        );
    }

    Region::new(
        catalog,
        Parameters::default(),
        config,
        preferences,
        experience,
        agents,
    )
    .unwrap()
}

fn run(seed: u64, farms: u32, years: u32) -> Vec<YearOutput> {
    let mut region = synthetic_region(seed, farms, 5);
    let mut solver = ScriptedSolver::new(region.catalog(), seed ^ 0x5eed);
    run_years(&mut region, &mut solver, years).unwrap()
}

#[test]
fn test_same_seed_same_records() {
    let a = run(42, 20, 8);
    let b = run(42, 20, 8);
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_diverge() {
    let a = run(42, 20, 8);
    let b = run(43, 20, 8);
    assert_ne!(a, b);
}

#[test]
fn test_parallel_and_serial_paths_agree() {
    // 80 farms sit above the default threshold of 64, so one region decides
    // on the rayon path; the other is forced serial with an unreachable
    // threshold. Outputs must match exactly.
    let farms = 80;
    let serial_config = EngineConfig {
        parallel_threshold: usize::MAX,
        ..EngineConfig::default()
    };
    let mut parallel_region = synthetic_region(7, farms, 5);
    let mut serial_region = synthetic_region_with_config(7, farms, 5, serial_config);

    let parallel_outputs = {
        let mut solver = ScriptedSolver::new(parallel_region.catalog(), 7 ^ 0x5eed);
        run_years(&mut parallel_region, &mut solver, 5).unwrap()
    };
    let serial_outputs = {
        let mut solver = ScriptedSolver::new(serial_region.catalog(), 7 ^ 0x5eed);
        run_years(&mut serial_region, &mut solver, 5).unwrap()
    };

    assert_eq!(serial_outputs, parallel_outputs);
}
