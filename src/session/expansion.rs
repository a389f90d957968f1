//! Expansion Set
//!
//! Folder id to expanded flag, persisted apart from the tree. Entries for
//! folders that no longer exist are harmless until pruned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, Tree};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSet {
    entries: BTreeMap<ItemId, bool>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: ItemId, expanded: bool) {
        self.entries.insert(id, expanded);
    }

    /// Flip and return the new state.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        let next = !self.is_expanded(id);
        self.entries.insert(id.clone(), next);
        next
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose folder is gone. Returns how many were removed.
    pub fn prune(&mut self, tree: &Tree) -> usize {
        let live: std::collections::HashSet<ItemId> = tree.ids().into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|id, _| live.contains(id));
        before - self.entries.len()
    }

    pub(crate) fn rename(&mut self, from: &ItemId, to: &ItemId) {
        if let Some(expanded) = self.entries.remove(from) {
            self.entries.insert(to.clone(), expanded);
        }
    }
}
