//! Consumat strategy selection

use serde::{Deserialize, Serialize};

use crate::core::config::Parameters;

/// The four Consumat cognitive strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Repetition,
    Imitation,
    Deliberation,
    SocialComparison,
}

/// Derive the strategy for one year from the two signals
///
/// This is a stateless re-derivation, not a transition: the same
/// satisfaction, uncertainty and thresholds always map to the same strategy.
/// Satisfied means satisfaction >= phi_plus, uncertain means
/// uncertainty >= phi_minus.
pub fn select_strategy(satisfaction: f64, uncertainty: f64, params: &Parameters) -> Strategy {
    let satisfied = satisfaction >= params.phi_plus;
    let uncertain = uncertainty >= params.phi_minus;

    match (satisfied, uncertain) {
        (true, false) => Strategy::Repetition,
        (true, true) => Strategy::SocialComparison,
        (false, false) => Strategy::Deliberation,
        (false, true) => Strategy::Imitation,
    }
}
