//! Farm decision-maker attributes

use serde::{Deserialize, Serialize};

/// The person running a farm
///
/// Fixed for the lifetime of a run except for age, which increments once per
/// simulation year. `memory` is how many past years of income the farm
/// retains and must match the shared memory length of the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub age: u32,
    pub education: u32,
    pub memory: usize,
    /// Entrepreneurship / risk tolerance in [0, 1]; higher favors novelty
    /// over habit when ranking activities
    pub entrepreneurship: f64,
}

impl Person {
    pub fn new(age: u32, education: u32, memory: usize, entrepreneurship: f64) -> Self {
        Self {
            age,
            education,
            memory,
            entrepreneurship,
        }
    }

    /// One year passes
    pub fn advance_age(&mut self) {
        self.age += 1;
    }
}
