//! # Completed set.
//!
//! Identities that ran successfully during this process. Grows monotonically,
//! except that every active cycle evicts all `Active` identities first so they
//! run again.

use std::collections::HashSet;

use crate::core::registry::Registry;
use crate::tasks::{InitId, Priority};

#[derive(Debug, Default)]
pub(crate) struct CompletedSet {
    ids: HashSet<InitId>,
}

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &InitId) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: InitId) {
        self.ids.insert(id);
    }

    /// Removes every identity registered with `priority`.
    pub fn evict(&mut self, priority: Priority, registry: &Registry) {
        for init in registry.phase(priority) {
            self.ids.remove(init.id());
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
