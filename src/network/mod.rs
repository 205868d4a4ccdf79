//! Weighted social network, one view per farm

use serde::{Deserialize, Serialize};

use crate::core::types::FarmId;

/// Trust weights from one farm to its peers
///
/// The owning farm is the implicit root; an edge weight is a non-negative
/// real giving how strongly a peer's behavior influences this farm. Edges are
/// kept sorted by peer id, so lookup is O(log n) and iteration order is
/// deterministic wherever weights feed arithmetic or tie-breaking. Read-only
/// after construction; the engine assumes nothing about topology beyond
/// "some peers with weights".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialNetwork {
    edges: Vec<(FarmId, f64)>,
}

impl SocialNetwork {
    /// Build from (peer, weight) pairs; edges are sorted by peer id and
    /// duplicate peers keep the last weight given.
    pub fn new(mut edges: Vec<(FarmId, f64)>) -> Self {
        edges.sort_by_key(|&(peer, _)| peer);
        edges.dedup_by(|a, b| {
            if a.0 == b.0 {
                b.1 = a.1;
                true
            } else {
                false
            }
        });
        Self { edges }
    }

    pub fn weight(&self, peer: FarmId) -> Option<f64> {
        self.edges
            .binary_search_by_key(&peer, |&(p, _)| p)
            .ok()
            .map(|i| self.edges[i].1)
    }

    /// Peers in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (FarmId, f64)> + '_ {
        self.edges.iter().copied()
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|&(_, w)| w).sum()
    }

    pub fn neighbor_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All weights must be non-negative
    pub fn validate(&self) -> Result<(), String> {
        for &(peer, weight) in &self.edges {
            if !(weight >= 0.0) {
                return Err(format!("edge weight to {peer} is {weight}, must be >= 0"));
            }
        }
        Ok(())
    }
}
