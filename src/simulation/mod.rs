//! Engine-side orchestration of the yearly cycle

pub mod record;
pub mod region;
pub mod solver;

pub use record::DecisionRecord;
pub use region::{Region, YearOutput};
pub use solver::{CandidateOffer, FarmSolver, ScriptedSolver, SolverOutcome, SolverResults};

use crate::core::error::Result;

/// Run a fixed number of year cycles against a solver
///
/// Convenience loop for drivers and tests: decide, solve, apply, repeat.
/// Returns the per-year outputs in order.
pub fn run_years(
    region: &mut Region,
    solver: &mut dyn FarmSolver,
    years: u32,
) -> Result<Vec<YearOutput>> {
    let mut outputs = Vec::with_capacity(years as usize);
    for _ in 0..years {
        let output = region.decide()?;
        let results = solver.solve(&output.offers);
        region.apply_results(&results)?;
        outputs.push(output);
    }
    Ok(outputs)
}
