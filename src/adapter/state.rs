//! Checkpoint state carried between invocations

use crate::maple::ItemType;
use serde::{Deserialize, Serialize};

/// Completion flag for one item type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProgress {
    pub completed: bool,
}

/// Per-item-type extraction progress
///
/// A flag is set only after every item of that type was pushed during the
/// current invocation. Serialized as
/// `{"customers": {"completed": false}, "maple_kb": {"completed": false}}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorState {
    #[serde(default)]
    pub customers: ResourceProgress,
    #[serde(default)]
    pub maple_kb: ResourceProgress,
}

impl ExtractorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, item_type: ItemType) -> bool {
        self.progress(item_type).completed
    }

    pub fn mark_completed(&mut self, item_type: ItemType) {
        self.progress_mut(item_type).completed = true;
    }

    /// Clear every flag, as at the start of a fresh data extraction
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn progress(&self, item_type: ItemType) -> &ResourceProgress {
        match item_type {
            ItemType::Customers => &self.customers,
            ItemType::MapleKb => &self.maple_kb,
        }
    }

    fn progress_mut(&mut self, item_type: ItemType) -> &mut ResourceProgress {
        match item_type {
            ItemType::Customers => &mut self.customers,
            ItemType::MapleKb => &mut self.maple_kb,
        }
    }
}

/// Loading keeps no checkpoint of its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderState {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_is_incomplete() {
        let state = ExtractorState::new();
        assert!(!state.is_completed(ItemType::Customers));
        assert!(!state.is_completed(ItemType::MapleKb));
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            json!({"customers": {"completed": false}, "maple_kb": {"completed": false}})
        );
    }

    #[test]
    fn test_mark_and_reset() {
        let mut state = ExtractorState::new();
        state.mark_completed(ItemType::MapleKb);
        assert!(state.is_completed(ItemType::MapleKb));
        assert!(!state.is_completed(ItemType::Customers));

        state.reset();
        assert!(!state.is_completed(ItemType::MapleKb));
    }

    #[test]
    fn test_partial_state_deserializes() {
        let state: ExtractorState =
            serde_json::from_value(json!({"customers": {"completed": true}})).unwrap();
        assert!(state.is_completed(ItemType::Customers));
        assert!(!state.is_completed(ItemType::MapleKb));
    }
}
