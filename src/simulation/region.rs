//! The yearly decision cycle over one population of farms

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activities::{Activity, ActivityCatalog};
use crate::agent::{FarmAgent, FarmProductMatrix};
use crate::core::config::{EngineConfig, MissingFarmPolicy, Parameters};
use crate::core::error::{EngineError, Result};
use crate::core::types::{FarmId, Year};
use crate::decision::{uncertainty, value_function, DecisionOutcome, Published, RegionView};
use crate::population;
use crate::simulation::record::DecisionRecord;
use crate::simulation::solver::{CandidateOffer, SolverResults};

/// Everything one decision cycle emits: offers for the solver and snapshot
/// records for the logger, both in farm-id order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOutput {
    pub year: Year,
    pub offers: Vec<CandidateOffer>,
    pub records: Vec<DecisionRecord>,
}

/// A population of farms sharing one activity catalog, parameter set and
/// regional income trend
///
/// The year cycle is two calls with a hard barrier between them:
/// `decide` emits candidate offers from the previous year's published state,
/// `apply_results` writes the solver's answer back and refreshes the regional
/// trend before the next `decide` may run. Sub-regional trends are modeled by
/// partitioning farms into several `Region` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    catalog: ActivityCatalog,
    params: Parameters,
    config: EngineConfig,
    preferences: FarmProductMatrix,
    experience: FarmProductMatrix,
    agents: Vec<FarmAgent>,
    regional_change: f64,
    year: Year,
}

impl Region {
    /// Assemble a region from validated in-memory inputs
    ///
    /// Checks the cross-structure invariants the external reader cannot see:
    /// dense farm ids, one shared memory length, matrix shape against the
    /// catalog, network weights. Computes the initial regional change rate
    /// from the burn-in histories.
    pub fn new(
        catalog: ActivityCatalog,
        params: Parameters,
        config: EngineConfig,
        preferences: FarmProductMatrix,
        experience: FarmProductMatrix,
        agents: Vec<FarmAgent>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(EngineError::InvalidConfiguration)?;
        params
            .validate()
            .map_err(EngineError::InvalidConfiguration)?;

        if agents.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "region needs at least one farm".into(),
            ));
        }

        let memory = agents[0].person.memory;
        if memory < 2 {
            return Err(EngineError::InvalidConfiguration(
                "memory length must be at least 2".into(),
            ));
        }

        for (index, agent) in agents.iter().enumerate() {
            if agent.id.index() != index {
                return Err(EngineError::InvalidConfiguration(format!(
                    "farm ids must be dense and ordered, found {} at position {index}",
                    agent.id
                )));
            }
            if agent.person.memory != memory {
                return Err(EngineError::InconsistentMemory {
                    farm: agent.id,
                    actual: agent.person.memory,
                    expected: memory,
                });
            }
            agent
                .network
                .validate()
                .map_err(EngineError::InvalidConfiguration)?;
            for (peer, _) in agent.network.iter() {
                if peer == agent.id || peer.index() >= agents.len() {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "{}: network edge to invalid peer {peer}",
                        agent.id
                    )));
                }
            }
            for activity in &agent.current_activities {
                let canonical = catalog.resolve(&activity.name)?;
                if canonical.id != activity.id {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "{}: activity '{}' disagrees with the catalog id",
                        agent.id, activity.name
                    )));
                }
            }
        }

        let expected_header = catalog.productive_names();
        for matrix in [&preferences, &experience] {
            if matrix.header() != expected_header.as_slice() {
                return Err(EngineError::InvalidConfiguration(
                    "matrix header does not match the catalog column order".into(),
                ));
            }
            if matrix.farm_count() != agents.len() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "matrix has {} rows for {} farms",
                    matrix.farm_count(),
                    agents.len()
                )));
            }
        }

        let regional_change =
            population::initial_change_rate(agents.iter().map(|a| &a.history))?;

        Ok(Self {
            catalog,
            params,
            config,
            preferences,
            experience,
            agents,
            regional_change,
            year: 0,
        })
    }

    pub fn agents(&self) -> &[FarmAgent] {
        &self.agents
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn regional_change(&self) -> f64 {
        self.regional_change
    }

    pub fn memory_length(&self) -> usize {
        self.agents[0].person.memory
    }

    /// Restore lookup indexes after deserialization
    pub fn restore_indexes(&mut self) {
        self.catalog.rebuild_index();
        self.preferences.rebuild_index();
        self.experience.rebuild_index();
    }

    /// Run one decision cycle for every farm
    ///
    /// All farms decide against the same immutable snapshot: the previous
    /// year's published peer state and the regional trend refreshed by the
    /// last `apply_results`. Decisions are independent and run in parallel
    /// above the configured threshold. A farm whose strategy filters away
    /// every activity falls back to the exit sentinel after the error is
    /// logged; any other failure aborts the cycle with the farm attached.
    pub fn decide(&mut self) -> Result<YearOutput> {
        self.year += 1;
        let year = self.year;
        let exit = self.catalog.exit_activity();

        let peers: BTreeMap<FarmId, Published> =
            self.agents.iter().map(|a| (a.id, a.published())).collect();
        let view = RegionView {
            catalog: &self.catalog,
            preferences: &self.preferences,
            experience: &self.experience,
            params: &self.params,
            selection: self.config.selection,
            peers: &peers,
            regional_change: self.regional_change,
        };

        let decide_one = |agent: &FarmAgent| -> Result<Option<DecisionOutcome>> {
            if agent.exited {
                return Ok(None);
            }
            match agent.decide_activity_set(&view) {
                Ok(outcome) => Ok(Some(outcome)),
                Err(EngineError::NoViableActivity { strategy, .. }) => {
                    tracing::warn!(farm = %agent.id, ?strategy, "empty candidate set, offering exit");
                    let satisfaction =
                        value_function::satisfaction(agent.id, &agent.history, view.params)?;
                    let personal_change =
                        value_function::personal_change(agent.id, &agent.history)?;
                    Ok(Some(DecisionOutcome {
                        strategy,
                        satisfaction,
                        uncertainty: uncertainty::divergence(
                            personal_change,
                            view.regional_change,
                        ),
                        personal_change,
                        candidates: vec![exit.clone()],
                    }))
                }
                Err(err) => Err(err),
            }
        };

        let decided: Vec<Option<DecisionOutcome>> =
            if self.agents.len() >= self.config.parallel_threshold {
                self.agents
                    .par_iter()
                    .map(|agent| decide_one(agent))
                    .collect::<Result<Vec<_>>>()?
            } else {
                self.agents
                    .iter()
                    .map(|agent| decide_one(agent))
                    .collect::<Result<Vec<_>>>()?
            };

        let mut offers = Vec::with_capacity(self.agents.len());
        let mut records = Vec::with_capacity(self.agents.len());

        for (agent, outcome) in self.agents.iter_mut().zip(&decided) {
            let candidates: Vec<Activity> = match outcome {
                Some(out) => out.candidates.clone(),
                // retired farms keep offering the exit sentinel
                None => vec![exit.clone()],
            };
            let strategy = outcome.as_ref().map(|o| o.strategy).unwrap_or(agent.strategy);
            let names: Vec<String> = candidates.iter().map(|a| a.name.clone()).collect();

            records.push(DecisionRecord {
                farm: agent.id,
                farm_name: agent.name.clone(),
                year,
                parameter_set: self.params.name.clone(),
                learning_rate: self.params.k,
                strategy,
                preference_row: self.preferences.row(agent.id)?.to_vec(),
                latest_income: agent.history.latest(),
                current_activities: agent
                    .current_activities
                    .iter()
                    .map(|a| a.name.clone())
                    .collect(),
                candidate_activities: names.clone(),
            });
            offers.push(CandidateOffer {
                farm: agent.id,
                activities: names,
            });

            if let Some(out) = outcome {
                agent.record_outcome(out);
            }
        }

        tracing::debug!(year, farms = offers.len(), "decision cycle complete");

        Ok(YearOutput {
            year,
            offers,
            records,
        })
    }

    /// Write one year's solver results back into the population
    ///
    /// Farms are matched by id; an id outside the population fails with
    /// `UnknownFarm`, an omitted farm follows the configured policy. Incomes
    /// are appended (append-then-truncate), experience moves one year
    /// (performed activities gain up to the memory cap, others decay toward
    /// zero), ages advance, and finally the regional trend is refreshed —
    /// the barrier every next-year decision waits behind.
    pub fn apply_results(&mut self, results: &SolverResults) -> Result<()> {
        for farm in results.farms() {
            if farm.index() >= self.agents.len() {
                return Err(EngineError::UnknownFarm(farm));
            }
        }

        let exit = self.catalog.exit_activity();
        let memory = self.memory_length();
        let year = self.year;

        for i in 0..self.agents.len() {
            let id = self.agents[i].id;
            let (income, selected) = match results.get(id) {
                Some(outcome) => (outcome.income, outcome.selected.clone()),
                None => match self.config.missing_farm {
                    MissingFarmPolicy::ExitWithZeroIncome => {
                        tracing::warn!(farm = %id, "solver omitted farm, applying exit with zero income");
                        (0.0, vec![exit.clone()])
                    }
                    MissingFarmPolicy::Fail => {
                        return Err(EngineError::MissingSolverResult(id));
                    }
                },
            };

            let performed = selected
                .iter()
                .filter(|a| !a.is_exit())
                .map(|a| self.experience.column_index(&a.name))
                .collect::<Result<Vec<_>>>()?;
            let row = self.experience.row_mut(id)?;
            for (col, value) in row.iter_mut().enumerate() {
                if performed.contains(&col) {
                    *value = (*value + 1).min(memory as i32);
                } else {
                    *value = (*value - 1).max(0);
                }
            }

            self.agents[i].update_after_round(income, selected)?;
        }

        self.regional_change = population::steady_change_rate(
            self.agents.iter().map(|a| &a.history),
            memory,
            year,
        )?;

        tracing::debug!(year, regional_change = self.regional_change, "results applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{IncomeHistory, Person};
    use crate::network::SocialNetwork;
    use crate::simulation::solver::SolverOutcome;

    fn small_region() -> Region {
        let catalog = ActivityCatalog::new(["wheat", "maize"]);
        let header = catalog.productive_names();

        let mut preferences = FarmProductMatrix::new(header.clone());
        let mut experience = FarmProductMatrix::new(header);
        let mut agents = Vec::new();
        for i in 0..3u32 {
            preferences.push_row(FarmId(i), vec![3, 2]).unwrap();
            experience.push_row(FarmId(i), vec![2, 0]).unwrap();
            let peers: Vec<(FarmId, f64)> = (0..3)
                .filter(|&j| j != i)
                .map(|j| (FarmId(j), 0.5))
                .collect();
            agents.push(
                FarmAgent::new(
                    FarmId(i),
                    format!("Farm{i}"),
                    Person::new(40 + i, 1, 3, 0.5),
                    IncomeHistory::new(vec![100.0, 100.0, 100.0]),
                    SocialNetwork::new(peers),
                    vec![catalog.resolve("wheat").unwrap()],
                )
                .unwrap(),
            );
        }

        Region::new(
            catalog,
            Parameters::default(),
            EngineConfig::default(),
            preferences,
            experience,
            agents,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_burn_in_gives_zero_baseline() {
        let region = small_region();
        assert_eq!(region.regional_change(), 0.0);
    }

    #[test]
    fn test_decide_emits_offer_and_record_per_farm() {
        let mut region = small_region();
        let output = region.decide().unwrap();

        assert_eq!(output.year, 1);
        assert_eq!(output.offers.len(), 3);
        assert_eq!(output.records.len(), 3);
        for offer in &output.offers {
            assert!(!offer.activities.is_empty());
        }
    }

    #[test]
    fn test_unknown_farm_in_results_rejected() {
        let mut region = small_region();
        region.decide().unwrap();

        let mut results = SolverResults::new();
        results.insert(
            FarmId(99),
            SolverOutcome {
                income: 100.0,
                selected: vec![region.catalog().resolve("wheat").unwrap()],
            },
        );
        let err = region.apply_results(&results).unwrap_err();
        assert!(matches!(err, EngineError::UnknownFarm(FarmId(99))));
    }

    #[test]
    fn test_missing_farm_defaults_to_exit_with_zero_income() {
        let mut region = small_region();
        region.decide().unwrap();

        let wheat = region.catalog().resolve("wheat").unwrap();
        let mut results = SolverResults::new();
        for i in 0..2 {
            results.insert(
                FarmId(i),
                SolverOutcome {
                    income: 105.0,
                    selected: vec![wheat.clone()],
                },
            );
        }
        // farm 2 omitted
        region.apply_results(&results).unwrap();

        let farm2 = &region.agents()[2];
        assert!(farm2.exited);
        assert_eq!(farm2.history.latest(), 0.0);
        assert!(farm2.current_activities[0].is_exit());
    }

    #[test]
    fn test_missing_farm_strict_policy_fails() {
        let catalog = ActivityCatalog::new(["wheat", "maize"]);
        let mut region = small_region();
        region.config.missing_farm = MissingFarmPolicy::Fail;
        region.decide().unwrap();

        let mut results = SolverResults::new();
        results.insert(
            FarmId(0),
            SolverOutcome {
                income: 105.0,
                selected: vec![catalog.resolve("wheat").unwrap()],
            },
        );
        let err = region.apply_results(&results).unwrap_err();
        assert!(matches!(err, EngineError::MissingSolverResult(_)));
    }

    #[test]
    fn test_experience_moves_with_selection() {
        let mut region = small_region();
        region.decide().unwrap();

        let maize = region.catalog().resolve("maize").unwrap();
        let mut results = SolverResults::new();
        for i in 0..3 {
            results.insert(
                FarmId(i),
                SolverOutcome {
                    income: 100.0,
                    selected: vec![maize.clone()],
                },
            );
        }
        region.apply_results(&results).unwrap();

        // maize gained a year, wheat decayed from 2 to 1
        assert_eq!(region.experience.value(FarmId(0), "maize").unwrap(), 1);
        assert_eq!(region.experience.value(FarmId(0), "wheat").unwrap(), 1);
    }

    #[test]
    fn test_experience_caps_at_memory() {
        let mut region = small_region();
        let wheat = region.catalog().resolve("wheat").unwrap();
        for _ in 0..6 {
            region.decide().unwrap();
            let mut results = SolverResults::new();
            for i in 0..3 {
                results.insert(
                    FarmId(i),
                    SolverOutcome {
                        income: 100.0,
                        selected: vec![wheat.clone()],
                    },
                );
            }
            region.apply_results(&results).unwrap();
        }
        // memory is 3, so wheat experience saturates there
        assert_eq!(region.experience.value(FarmId(0), "wheat").unwrap(), 3);
    }

    #[test]
    fn test_exited_farm_keeps_offering_exit() {
        let mut region = small_region();
        region.decide().unwrap();

        let mut results = SolverResults::new();
        results.insert(
            FarmId(0),
            SolverOutcome {
                income: 0.0,
                selected: vec![region.catalog().exit_activity()],
            },
        );
        let wheat = region.catalog().resolve("wheat").unwrap();
        for i in 1..3 {
            results.insert(
                FarmId(i),
                SolverOutcome {
                    income: 102.0,
                    selected: vec![wheat.clone()],
                },
            );
        }
        region.apply_results(&results).unwrap();

        let output = region.decide().unwrap();
        assert_eq!(output.offers[0].activities, vec!["exit_activity".to_string()]);
    }

    #[test]
    fn test_dense_id_check() {
        let catalog = ActivityCatalog::new(["wheat"]);
        let header = catalog.productive_names();
        let mut preferences = FarmProductMatrix::new(header.clone());
        preferences.push_row(FarmId(0), vec![1]).unwrap();
        let mut experience = FarmProductMatrix::new(header);
        experience.push_row(FarmId(0), vec![0]).unwrap();

        let agent = FarmAgent::new(
            FarmId(5),
            "Stray".into(),
            Person::new(40, 1, 3, 0.5),
            IncomeHistory::new(vec![100.0, 100.0, 100.0]),
            SocialNetwork::default(),
            vec![catalog.resolve("wheat").unwrap()],
        )
        .unwrap();

        let err = Region::new(
            catalog,
            Parameters::default(),
            EngineConfig::default(),
            preferences,
            experience,
            vec![agent],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }
}
