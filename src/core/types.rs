//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for farms
///
/// Ids are dense indices handed out by the region builder in input order.
/// All cross-farm references (network edges, solver results) use this id;
/// display names stay on the agent for logging only. Deterministic
/// tie-breaks are always "lowest FarmId".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FarmId(pub u32);

impl FarmId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FarmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "farm#{}", self.0)
    }
}

/// Unique identifier for activities in the master catalog
///
/// Id 0 is reserved for the exit/retirement sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub u16);

/// Simulation year counter
pub type Year = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farm_id_equality() {
        let a = FarmId(1);
        let b = FarmId(1);
        let c = FarmId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_farm_id_ordering() {
        // Lowest id wins deterministic tie-breaks, so ordering must hold
        assert!(FarmId(0) < FarmId(1));
        assert!(FarmId(7) < FarmId(100));
    }

    #[test]
    fn test_farm_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<FarmId, &str> = HashMap::new();
        map.insert(FarmId(1), "Baumann");
        assert_eq!(map.get(&FarmId(1)), Some(&"Baumann"));
    }

    #[test]
    fn test_activity_id_ordering() {
        assert!(ActivityId(0) < ActivityId(3));
    }
}
