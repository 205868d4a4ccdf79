//! Bounded income history, newest entry first

use serde::{Deserialize, Serialize};

/// Ordered sequence of past incomes for one farm
///
/// Index 0 is the most recent year. The length equals the farm's memory at
/// all times: `append` pushes the new income to the front and drops the
/// oldest entry, so the invariant holds by construction after the burn-in
/// histories are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeHistory {
    incomes: Vec<f64>,
}

impl IncomeHistory {
    /// Wrap an initial history; the region builder checks the length against
    /// the farm's memory before agents are constructed.
    pub fn new(incomes: Vec<f64>) -> Self {
        Self { incomes }
    }

    /// Record a realized income: append at the front, drop the oldest
    pub fn append(&mut self, income: f64) {
        self.incomes.insert(0, income);
        self.incomes.pop();
    }

    /// Most recent income
    pub fn latest(&self) -> f64 {
        self.incomes[0]
    }

    /// Personal reference point: mean of all retained years except the most
    /// recent one
    pub fn reference_mean(&self) -> f64 {
        let older = &self.incomes[1..];
        older.iter().sum::<f64>() / older.len() as f64
    }

    pub fn len(&self) -> usize {
        self.incomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.incomes
    }
}
