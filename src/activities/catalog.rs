//! Activity definitions and catalog

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::ActivityId;

/// Reserved name of the exit/retirement sentinel (id 0)
pub const EXIT_ACTIVITY_NAME: &str = "exit_activity";

/// A crop or livestock activity from the closed master list
///
/// Immutable value; two activities are the same when id and name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
}

impl Activity {
    /// True for the reserved exit/retirement sentinel
    pub fn is_exit(&self) -> bool {
        self.id == ActivityId(0)
    }
}

/// The closed master list of activities for a region
///
/// Index 0 always holds the exit sentinel; productive activities follow in
/// input order with ids 1..n. Name lookups are O(1). Built once from
/// validated configuration, read-only afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
    #[serde(skip, default)]
    by_name: AHashMap<String, usize>,
}

impl ActivityCatalog {
    /// Build a catalog from productive activity names; the exit sentinel is
    /// inserted automatically at id 0.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut activities = vec![Activity {
            id: ActivityId(0),
            name: EXIT_ACTIVITY_NAME.to_string(),
        }];
        for name in names {
            let id = ActivityId(activities.len() as u16);
            activities.push(Activity {
                id,
                name: name.into(),
            });
        }
        let by_name = Self::build_index(&activities);
        Self {
            activities,
            by_name,
        }
    }

    fn build_index(activities: &[Activity]) -> AHashMap<String, usize> {
        activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect()
    }

    /// Restore the name index after deserialization
    pub fn rebuild_index(&mut self) {
        self.by_name = Self::build_index(&self.activities);
    }

    pub fn exit_activity(&self) -> Activity {
        self.activities[0].clone()
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Activity> {
        self.by_name.get(name).map(|&i| &self.activities[i])
    }

    /// Resolve a name against the master list, failing on unknown names
    pub fn resolve(&self, name: &str) -> Result<Activity> {
        self.by_name(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownActivity(name.to_string()))
    }

    /// Productive activities only, in id order; the exit sentinel never ranks
    pub fn productive(&self) -> &[Activity] {
        &self.activities[1..]
    }

    /// Names of productive activities, in the fixed column order shared with
    /// the preference and experience matrices
    pub fn productive_names(&self) -> Vec<String> {
        self.productive().iter().map(|a| a.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
