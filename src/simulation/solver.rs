//! Contract with the external farm-optimization solver
//!
//! The real solver is a separate mathematical-programming process and stays
//! out of scope; this module fixes the data exchanged with it and provides a
//! scripted in-memory stand-in for tests and the demo driver.

use std::collections::BTreeMap;

use ahash::AHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::activities::{Activity, ActivityCatalog};
use crate::core::types::FarmId;

/// One farm's offer for the year: an ordered, non-empty list of candidate
/// activity names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateOffer {
    pub farm: FarmId,
    pub activities: Vec<String>,
}

/// What the solver reports back for one farm
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    /// Realized income for the completed year
    pub income: f64,
    /// Selected activity mix; may be the exit sentinel alone
    pub selected: Vec<Activity>,
}

/// Solver results for a whole region, keyed by farm id
///
/// Farms are matched by identifier, never by list position; a farm may be
/// missing entirely (the engine's missing-farm policy decides what happens).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverResults {
    outcomes: BTreeMap<FarmId, SolverOutcome>,
}

impl SolverResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, farm: FarmId, outcome: SolverOutcome) {
        self.outcomes.insert(farm, outcome);
    }

    pub fn get(&self, farm: FarmId) -> Option<&SolverOutcome> {
        self.outcomes.get(&farm)
    }

    /// Farm ids present, ascending
    pub fn farms(&self) -> impl Iterator<Item = FarmId> + '_ {
        self.outcomes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Anything that can turn a year's offers into realized results
pub trait FarmSolver {
    fn solve(&mut self, offers: &[CandidateOffer]) -> SolverResults;
}

/// Deterministic in-memory solver stand-in
///
/// Assigns every productive activity a fixed gross margin at construction
/// and, for each offer, picks the candidate with the highest margin. Realized
/// income is that margin with a small seeded jitter, so repeated runs with
/// the same seed reproduce bit-identical results.
#[derive(Debug, Clone)]
pub struct ScriptedSolver {
    margins: AHashMap<String, (Activity, f64)>,
    exit: Activity,
    rng: ChaCha8Rng,
    jitter: f64,
}

impl ScriptedSolver {
    pub fn new(catalog: &ActivityCatalog, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let margins = catalog
            .productive()
            .iter()
            .map(|activity| {
                let margin = rng.gen_range(60.0..140.0);
                (activity.name.clone(), (activity.clone(), margin))
            })
            .collect();
        Self {
            margins,
            exit: catalog.exit_activity(),
            rng,
            jitter: 0.1,
        }
    }

    fn best_candidate(&self, offer: &CandidateOffer) -> Option<(Activity, f64)> {
        offer
            .activities
            .iter()
            .filter_map(|name| self.margins.get(name).cloned())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl FarmSolver for ScriptedSolver {
    fn solve(&mut self, offers: &[CandidateOffer]) -> SolverResults {
        let mut results = SolverResults::new();
        for offer in offers {
            let outcome = match self.best_candidate(offer) {
                Some((activity, margin)) => {
                    let noise = self.rng.gen_range(-self.jitter..self.jitter);
                    SolverOutcome {
                        income: margin * (1.0 + noise),
                        selected: vec![activity],
                    }
                }
                // nothing productive offered: the farm leaves
                None => SolverOutcome {
                    income: 0.0,
                    selected: vec![self.exit.clone()],
                },
            };
            results.insert(offer.farm, outcome);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ActivityCatalog {
        ActivityCatalog::new(["wheat", "maize", "dairy"])
    }

    fn offer(farm: u32, names: &[&str]) -> CandidateOffer {
        CandidateOffer {
            farm: FarmId(farm),
            activities: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_scripted_solver_is_deterministic() {
        let catalog = catalog();
        let offers = vec![offer(0, &["wheat", "maize"]), offer(1, &["dairy"])];

        let mut a = ScriptedSolver::new(&catalog, 42);
        let mut b = ScriptedSolver::new(&catalog, 42);
        assert_eq!(a.solve(&offers), b.solve(&offers));
    }

    #[test]
    fn test_results_keyed_by_farm_id() {
        let catalog = catalog();
        let mut solver = ScriptedSolver::new(&catalog, 7);
        let results = solver.solve(&[offer(3, &["wheat"]), offer(1, &["maize"])]);

        assert_eq!(results.len(), 2);
        assert!(results.get(FarmId(1)).is_some());
        assert!(results.get(FarmId(3)).is_some());
        assert!(results.get(FarmId(0)).is_none());
        let farms: Vec<_> = results.farms().collect();
        assert_eq!(farms, vec![FarmId(1), FarmId(3)]);
    }

    #[test]
    fn test_exit_only_offer_retires_with_zero_income() {
        let catalog = catalog();
        let mut solver = ScriptedSolver::new(&catalog, 7);
        let results = solver.solve(&[offer(0, &["exit_activity"])]);

        let outcome = results.get(FarmId(0)).unwrap();
        assert_eq!(outcome.income, 0.0);
        assert!(outcome.selected[0].is_exit());
    }

    #[test]
    fn test_picks_highest_margin_candidate() {
        let catalog = catalog();
        let mut solver = ScriptedSolver::new(&catalog, 11);
        let full = solver.solve(&[offer(0, &["wheat", "maize", "dairy"])]);
        let selected = &full.get(FarmId(0)).unwrap().selected[0];

        // offering only that activity must select the same one
        let single = solver.solve(&[offer(0, &[selected.name.as_str()])]);
        assert_eq!(&single.get(FarmId(0)).unwrap().selected[0], selected);
    }
}
