//! Prospect-theory satisfaction signal

use crate::agent::income::IncomeHistory;
use crate::core::config::Parameters;
use crate::core::error::{EngineError, Result};
use crate::core::types::FarmId;

/// Satisfaction with the most recent income, evaluated against the farm's
/// personal reference point
///
/// The reference is the mean of the retained years excluding the newest.
/// Gains curve with `alpha_plus`, losses with `alpha_minus` scaled by the
/// loss-aversion multiplier `lambda`, and the result is normalized by the
/// reference magnitude to a dimensionless score. A zero reference leaves the
/// normalization undefined and is surfaced as `DegenerateReference`; callers
/// guard against zero-income histories.
pub fn satisfaction(farm: FarmId, history: &IncomeHistory, params: &Parameters) -> Result<f64> {
    let reference = history.reference_mean();
    if reference == 0.0 {
        return Err(EngineError::DegenerateReference { farm });
    }

    let delta = history.latest() - reference;
    let value = if delta >= 0.0 {
        delta.powf(params.alpha_plus)
    } else {
        -params.lambda * (-delta).powf(params.alpha_minus)
    };

    Ok(value / reference.abs())
}

/// Percent change of the farm's own income: newest year against the personal
/// reference mean
///
/// Shares the zero-reference guard with `satisfaction`; both signals break on
/// the same degenerate histories.
pub fn personal_change(farm: FarmId, history: &IncomeHistory) -> Result<f64> {
    let reference = history.reference_mean();
    if reference == 0.0 {
        return Err(EngineError::DegenerateReference { farm });
    }
    Ok((history.latest() - reference) / reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn test_gain_is_positive() {
        let history = IncomeHistory::new(vec![120.0, 100.0, 100.0]);
        let s = satisfaction(FarmId(0), &history, &params()).unwrap();
        assert!(s > 0.0);
    }

    #[test]
    fn test_loss_scenario_is_negative() {
        // reference = 100, current = 80, alpha_minus = 0.88, lambda = 2.25
        let history = IncomeHistory::new(vec![80.0, 100.0, 100.0]);
        let s = satisfaction(FarmId(0), &history, &params()).unwrap();

        let expected = -2.25 * 20.0_f64.powf(0.88) / 100.0;
        assert!((s - expected).abs() < 1e-12);
        assert!(s < 0.0);
    }

    #[test]
    fn test_losses_sting_more_than_gains() {
        let gain = IncomeHistory::new(vec![120.0, 100.0, 100.0]);
        let loss = IncomeHistory::new(vec![80.0, 100.0, 100.0]);
        let p = params();

        let up = satisfaction(FarmId(0), &gain, &p).unwrap();
        let down = satisfaction(FarmId(0), &loss, &p).unwrap();
        assert!(down.abs() > up.abs());
    }

    #[test]
    fn test_monotone_in_current_income() {
        let p = params();
        let mut last = f64::NEG_INFINITY;
        for income in [60.0, 80.0, 99.0, 100.0, 101.0, 140.0] {
            let history = IncomeHistory::new(vec![income, 100.0, 100.0]);
            let s = satisfaction(FarmId(0), &history, &p).unwrap();
            assert!(s >= last, "satisfaction must not decrease as income rises");
            last = s;
        }
    }

    #[test]
    fn test_zero_reference_fails() {
        let history = IncomeHistory::new(vec![50.0, 0.0, 0.0]);
        let err = satisfaction(FarmId(3), &history, &params()).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateReference { farm } if farm == FarmId(3)));
    }

    #[test]
    fn test_personal_change() {
        let history = IncomeHistory::new(vec![110.0, 100.0, 100.0]);
        let change = personal_change(FarmId(0), &history).unwrap();
        assert!((change - 0.1).abs() < 1e-12);
    }
}
