//! Farm-by-activity score tables

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::FarmId;

/// A farm x activity table of integer scores
///
/// One shared header fixes the column order (the productive activity names of
/// the catalog); every farm's row has exactly that length. The engine keeps
/// two instances with identical shape: subjective preferences and years of
/// experience. Rows are indexed by the dense `FarmId`, name lookups resolve
/// through an O(1) column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmProductMatrix {
    header: Vec<String>,
    rows: Vec<Vec<i32>>,
    #[serde(skip, default)]
    columns: AHashMap<String, usize>,
}

impl FarmProductMatrix {
    pub fn new(header: Vec<String>) -> Self {
        let columns = Self::build_columns(&header);
        Self {
            header,
            rows: Vec::new(),
            columns,
        }
    }

    fn build_columns(header: &[String]) -> AHashMap<String, usize> {
        header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect()
    }

    /// Restore the column index after deserialization
    pub fn rebuild_index(&mut self) {
        self.columns = Self::build_columns(&self.header);
    }

    /// Append the row for the next farm id; farms must be inserted in id order
    pub fn push_row(&mut self, farm: FarmId, values: Vec<i32>) -> Result<()> {
        if values.len() != self.header.len() {
            return Err(EngineError::MalformedMatrixRow {
                farm,
                actual: values.len(),
                expected: self.header.len(),
            });
        }
        if farm.index() != self.rows.len() {
            return Err(EngineError::UnknownFarm(farm));
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn column_index(&self, activity: &str) -> Result<usize> {
        self.columns
            .get(activity)
            .copied()
            .ok_or_else(|| EngineError::UnknownActivity(activity.to_string()))
    }

    pub fn row(&self, farm: FarmId) -> Result<&[i32]> {
        self.rows
            .get(farm.index())
            .map(Vec::as_slice)
            .ok_or(EngineError::UnknownFarm(farm))
    }

    pub fn row_mut(&mut self, farm: FarmId) -> Result<&mut [i32]> {
        self.rows
            .get_mut(farm.index())
            .map(Vec::as_mut_slice)
            .ok_or(EngineError::UnknownFarm(farm))
    }

    /// Value of one cell, resolved by farm id and activity name
    pub fn value(&self, farm: FarmId, activity: &str) -> Result<i32> {
        let col = self.column_index(activity)?;
        Ok(self.row(farm)?[col])
    }

    pub fn set_value(&mut self, farm: FarmId, activity: &str, value: i32) -> Result<()> {
        let col = self.column_index(activity)?;
        self.row_mut(farm)?[col] = value;
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn farm_count(&self) -> usize {
        self.rows.len()
    }
}
