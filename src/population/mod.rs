//! Population-level income trend aggregation
//!
//! The regional income change rate is the baseline every farm's uncertainty
//! is measured against. It is refreshed once per year, strictly before any
//! farm computes its signals for the next year.

use crate::agent::income::IncomeHistory;
use crate::core::error::{EngineError, Result};
use crate::core::types::Year;

/// Initial regional change rate from burn-in histories
///
/// Each farm contributes a personal baseline (mean of its retained years
/// excluding the newest); the percent change compares the population mean of
/// newest incomes against the population mean of those baselines. A zero
/// historical mean makes the rate undefined and is surfaced, never defaulted.
pub fn initial_change_rate<'a, I>(histories: I) -> Result<f64>
where
    I: IntoIterator<Item = &'a IncomeHistory>,
{
    let mut historical_sum = 0.0;
    let mut current_sum = 0.0;
    let mut count = 0usize;

    for history in histories {
        historical_sum += history.reference_mean();
        current_sum += history.latest();
        count += 1;
    }

    if count == 0 {
        return Err(EngineError::DegenerateTrend {
            year: 0,
            detail: "no farms in population".into(),
        });
    }

    let historical_mean = historical_sum / count as f64;
    let current_mean = current_sum / count as f64;

    if historical_mean == 0.0 {
        return Err(EngineError::DegenerateTrend {
            year: 0,
            detail: "historical population mean is zero".into(),
        });
    }

    Ok((current_mean - historical_mean) / historical_mean)
}

/// Steady-state regional change rate across the full memory window
///
/// Called after the year's realized incomes were appended, so every history
/// already holds the window "most recent year plus all but the oldest
/// retained year". Builds the population mean income per year slot, then
/// averages the year-over-year percent changes across the window.
pub fn steady_change_rate<'a, I>(histories: I, memory: usize, year: Year) -> Result<f64>
where
    I: IntoIterator<Item = &'a IncomeHistory>,
{
    let mut sums = vec![0.0; memory];
    let mut count = 0usize;

    for history in histories {
        for (slot, &income) in history.as_slice().iter().take(memory).enumerate() {
            sums[slot] += income;
        }
        count += 1;
    }

    if count == 0 {
        return Err(EngineError::DegenerateTrend {
            year,
            detail: "no farms in population".into(),
        });
    }

    // population mean per year slot, newest first
    let means: Vec<f64> = sums.iter().map(|s| s / count as f64).collect();

    let mut change_sum = 0.0;
    for t in 0..memory - 1 {
        let newer = means[t];
        let older = means[t + 1];
        if older == 0.0 {
            return Err(EngineError::DegenerateTrend {
                year,
                detail: format!("population mean {} years back is zero", t + 1),
            });
        }
        change_sum += (newer - older) / older;
    }

    Ok(change_sum / (memory - 1) as f64)
}
