//! Per-farm, per-year decision snapshots for the external logger

use serde::{Deserialize, Serialize};

use crate::core::types::{FarmId, Year};
use crate::decision::Strategy;

/// Read-only snapshot of one farm's decision in one year
///
/// Plain data, no behavior: everything the excluded logging layer needs to
/// write its rows. Activity sets are carried as names, the wire currency of
/// the solver boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub farm: FarmId,
    pub farm_name: String,
    pub year: Year,
    /// Name of the parameter set in effect
    pub parameter_set: String,
    /// Learning-rate constant applied in the desirability ranking
    pub learning_rate: f64,
    pub strategy: Strategy,
    /// The farm's row of the preference matrix, in shared column order
    pub preference_row: Vec<i32>,
    /// Most recent realized income
    pub latest_income: f64,
    pub current_activities: Vec<String>,
    pub candidate_activities: Vec<String>,
}
