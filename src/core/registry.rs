//! # Registry: immutable, ordered set of initializers.
//!
//! Registration order is kept; it decides the order in which independent
//! initializers of a phase are attempted. Lookup is by [`InitId`].
//! Dependencies are **not** validated here; an unknown dependency is reported
//! lazily when the resolver reaches it.

use std::collections::HashMap;

use crate::error::BuildError;
use crate::tasks::{InitId, InitRef, Priority};

/// Ordered collection of initializers, indexed by identity.
pub(crate) struct Registry {
    inits: Vec<InitRef>,
    index: HashMap<InitId, usize>,
}

impl Registry {
    /// Builds the registry, rejecting duplicate identities.
    pub fn new(inits: Vec<InitRef>) -> Result<Self, BuildError> {
        let mut index = HashMap::with_capacity(inits.len());
        for (pos, init) in inits.iter().enumerate() {
            if index.insert(init.id().clone(), pos).is_some() {
                return Err(BuildError::DuplicateInitializer {
                    id: init.id().clone(),
                });
            }
        }
        Ok(Self { inits, index })
    }

    pub fn get(&self, id: &InitId) -> Option<&InitRef> {
        self.index.get(id).map(|&pos| &self.inits[pos])
    }

    /// Initializers of one priority class, in registration order.
    pub fn phase(&self, priority: Priority) -> impl Iterator<Item = &InitRef> + '_ {
        self.inits
            .iter()
            .filter(move |init| init.priority() == priority)
    }

    pub fn len(&self) -> usize {
        self.inits.len()
    }
}
