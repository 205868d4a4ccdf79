//! The Consumat decision engine
//!
//! Converts a farm's income history into satisfaction and uncertainty
//! signals, derives one of the four cognitive strategies, and builds the
//! candidate activity set offered to the external solver.

pub mod candidate;
pub mod strategy;
pub mod uncertainty;
pub mod value_function;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use candidate::{DecisionContext, Published};
pub use strategy::{select_strategy, Strategy};

use crate::activities::{Activity, ActivityCatalog};
use crate::agent::matrix::FarmProductMatrix;
use crate::core::config::{Parameters, SelectionPolicy};
use crate::core::types::FarmId;

/// Shared read-only inputs for every farm's decision in one year
///
/// Built once per year after the population trend refresh; peers carry the
/// previous year's published state only, so per-farm decisions are mutually
/// independent.
pub struct RegionView<'a> {
    pub catalog: &'a ActivityCatalog,
    pub preferences: &'a FarmProductMatrix,
    pub experience: &'a FarmProductMatrix,
    pub params: &'a Parameters,
    pub selection: SelectionPolicy,
    pub peers: &'a BTreeMap<FarmId, Published>,
    /// Population income change rate, the uncertainty baseline
    pub regional_change: f64,
}

/// Everything one farm derives in a single decision cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub strategy: Strategy,
    pub satisfaction: f64,
    pub uncertainty: f64,
    pub personal_change: f64,
    pub candidates: Vec<Activity>,
}
