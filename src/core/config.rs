//! Engine configuration with documented constants
//!
//! Two records travel through the engine: the behavioral `Parameters` of the
//! Consumat model (calibrated per parameter set, loaded once, never mutated)
//! and the `EngineConfig` knobs that control candidate selection and
//! execution. Both are owned by the region and passed down by reference;
//! there is no global state.

use serde::{Deserialize, Serialize};

/// How the ranked activity list is cut down to the candidate set
///
/// DELIBERATION and SOCIAL_COMPARISON rank every productive activity by a
/// desirability score and then apply this policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Keep the k best-scoring activities
    TopK(usize),
    /// Keep every activity scoring at or above the floor
    ScoreFloor(f64),
}

/// What to do when the solver omits a farm from its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingFarmPolicy {
    /// Treat the farm as having taken the exit activity with zero income
    ExitWithZeroIncome,
    /// Surface an error and let the driver abort the year
    Fail,
}

/// Execution and selection knobs for the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Candidate selection policy applied after ranking
    pub selection: SelectionPolicy,

    /// Fallback behavior for farms the solver did not report on
    pub missing_farm: MissingFarmPolicy,

    /// Minimum farm count before per-farm decisions run in parallel
    ///
    /// Below this threshold thread overhead exceeds the benefit; a few
    /// hundred farms decide in well under a millisecond serially.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy::TopK(3),
            missing_farm: MissingFarmPolicy::ExitWithZeroIncome,
            parallel_threshold: 64,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        match self.selection {
            SelectionPolicy::TopK(0) => {
                return Err("selection TopK(0) can never produce a candidate set".into());
            }
            SelectionPolicy::ScoreFloor(floor) if !floor.is_finite() => {
                return Err(format!("selection score floor {floor} is not finite"));
            }
            _ => {}
        }
        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }
        Ok(())
    }
}

/// Consumat model constants, shared by every farm in a region
///
/// Defaults carry the canonical prospect-theory curvature and loss aversion;
/// thresholds and weighting constants are calibration placeholders that real
/// runs override from a named parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Value-function curvature for gains
    pub alpha_plus: f64,
    /// Value-function curvature for losses
    pub alpha_minus: f64,
    /// Loss-aversion multiplier
    pub lambda: f64,
    /// Satisfaction threshold: at or above is "satisfied"
    pub phi_plus: f64,
    /// Uncertainty threshold: at or above is "uncertain"
    pub phi_minus: f64,
    /// Weight of the preference term in the desirability score
    pub a: f64,
    /// Weight of the experience term in the desirability score
    pub b: f64,
    /// Learning-rate constant of the experience curve
    pub k: f64,
    /// Name of the parameter set, carried through to decision records
    pub name: String,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            alpha_plus: 0.88,
            alpha_minus: 0.88,
            lambda: 2.25,
            phi_plus: 0.2,
            phi_minus: 0.5,
            a: 0.6,
            b: 0.4,
            k: 0.6,
            name: "default".into(),
        }
    }
}

impl Parameters {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.alpha_plus) || self.alpha_plus == 0.0 {
            return Err(format!("alpha_plus ({}) must be in (0, 1]", self.alpha_plus));
        }
        if !(0.0..=1.0).contains(&self.alpha_minus) || self.alpha_minus == 0.0 {
            return Err(format!("alpha_minus ({}) must be in (0, 1]", self.alpha_minus));
        }
        if self.lambda < 1.0 {
            return Err(format!("lambda ({}) must be >= 1 for loss aversion", self.lambda));
        }
        if !self.phi_plus.is_finite() || !self.phi_minus.is_finite() {
            return Err("phi thresholds must be finite".into());
        }
        if self.a < 0.0 || self.b < 0.0 {
            return Err("a and b weighting constants must be non-negative".into());
        }
        if self.k <= 0.0 {
            return Err(format!("learning rate k ({}) must be positive", self.k));
        }
        Ok(())
    }
}
