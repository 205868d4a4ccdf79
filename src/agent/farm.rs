//! The farm agent: owned state plus the yearly decision entry points

use serde::{Deserialize, Serialize};

use crate::activities::Activity;
use crate::agent::income::IncomeHistory;
use crate::agent::person::Person;
use crate::core::error::{EngineError, Result};
use crate::core::types::FarmId;
use crate::decision::candidate::DecisionContext;
use crate::decision::{self, DecisionOutcome, Published, RegionView, Strategy};
use crate::network::SocialNetwork;

/// One farm's full state across years
///
/// The agent owns its history, person and network view; the preference and
/// experience matrices and the parameter record are region-owned and passed
/// in by reference at decision time. Signals derived in the latest cycle are
/// kept so peers can read them the following year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmAgent {
    pub id: FarmId,
    pub name: String,
    pub person: Person,
    pub history: IncomeHistory,
    pub network: SocialNetwork,
    pub current_activities: Vec<Activity>,

    /// Strategy applied in the most recent decision cycle
    pub strategy: Strategy,
    /// Satisfaction published for peers; None until the first cycle ran
    pub satisfaction: Option<f64>,
    pub uncertainty: Option<f64>,
    pub personal_change: Option<f64>,
    /// Set once the solver selects the exit activity for this farm
    pub exited: bool,
}

impl FarmAgent {
    pub fn new(
        id: FarmId,
        name: String,
        person: Person,
        history: IncomeHistory,
        network: SocialNetwork,
        current_activities: Vec<Activity>,
    ) -> Result<Self> {
        if history.len() != person.memory {
            return Err(EngineError::InconsistentMemory {
                farm: id,
                actual: history.len(),
                expected: person.memory,
            });
        }
        Ok(Self {
            id,
            name,
            person,
            history,
            network,
            current_activities,
            strategy: Strategy::Repetition,
            satisfaction: None,
            uncertainty: None,
            personal_change: None,
            exited: false,
        })
    }

    /// Previous-year snapshot exposed to peers
    pub fn published(&self) -> Published {
        Published {
            activities: self.current_activities.clone(),
            satisfaction: self.satisfaction,
        }
    }

    /// Run one decision cycle against the shared region view
    ///
    /// Pure with respect to the agent: signals are returned, not stored, so
    /// all farms can decide in parallel against the same published state.
    /// The caller applies the outcome afterward via `record_outcome`.
    pub fn decide_activity_set(&self, view: &RegionView) -> Result<DecisionOutcome> {
        let satisfaction =
            decision::value_function::satisfaction(self.id, &self.history, view.params)?;
        let personal_change = decision::value_function::personal_change(self.id, &self.history)?;
        let uncertainty =
            decision::uncertainty::divergence(personal_change, view.regional_change);
        let strategy = decision::select_strategy(satisfaction, uncertainty, view.params);

        let ctx = DecisionContext {
            farm: self.id,
            catalog: view.catalog,
            preferences: view.preferences,
            experience: view.experience,
            network: &self.network,
            peers: view.peers,
            current: &self.current_activities,
            tolerance: self.person.entrepreneurship,
            params: view.params,
            selection: view.selection,
        };
        let candidates = decision::candidate::build(strategy, &ctx)?;

        Ok(DecisionOutcome {
            strategy,
            satisfaction,
            uncertainty,
            personal_change,
            candidates,
        })
    }

    /// Store the derived signals after all farms decided
    pub fn record_outcome(&mut self, outcome: &DecisionOutcome) {
        self.strategy = outcome.strategy;
        self.satisfaction = Some(outcome.satisfaction);
        self.uncertainty = Some(outcome.uncertainty);
        self.personal_change = Some(outcome.personal_change);
    }

    /// Apply one year's solver result: realized income and selected set
    ///
    /// Appends to the income history (append-then-truncate), replaces the
    /// current activity set and bumps the decision-maker's age. Selecting the
    /// exit sentinel retires the farm.
    pub fn update_after_round(&mut self, income: f64, selected: Vec<Activity>) -> Result<()> {
        self.history.append(income);
        if self.history.len() != self.person.memory {
            return Err(EngineError::InconsistentMemory {
                farm: self.id,
                actual: self.history.len(),
                expected: self.person.memory,
            });
        }
        self.exited = selected.iter().any(|a| a.is_exit());
        self.current_activities = selected;
        self.person.advance_age();
        Ok(())
    }
}
