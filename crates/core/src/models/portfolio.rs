use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Ordered collection of holdings.
///
/// Insertion order is preserved for display and for tie-breaking in the
/// classifier; computation does not otherwise depend on it.
/// Invariant: at most one holding per `asset_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Index of the holding for `asset_id`, if present.
    pub fn position_of(&self, asset_id: &str) -> Option<usize> {
        self.holdings.iter().position(|h| h.asset_id == asset_id)
    }

    pub fn get(&self, asset_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.asset_id == asset_id)
    }

    /// Asset ids of all holdings, in portfolio order.
    pub fn asset_ids(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.asset_id.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.holdings.clear();
    }
}
