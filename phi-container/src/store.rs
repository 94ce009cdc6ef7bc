//! Binding store — maps aliases to their [`Binding`].
//!
//! Re-binding an alias silently replaces the previous binding.

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::alias::Alias;
use crate::binding::Binding;

/// Stores the alias → binding map of one container.
///
/// Lookups hand out clones so no map guard is held while a binding runs;
/// factories are free to bind or make through the same container.
#[derive(Debug, Default)]
pub struct BindingStore {
    bindings: DashMap<Alias, Binding>,
}

impl BindingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `alias`, replacing any earlier binding.
    pub fn bind(&self, alias: Alias, binding: Binding) {
        debug!(alias = %alias, binding = %binding, "Bound alias");
        if let Some(previous) = self.bindings.insert(alias.clone(), binding) {
            trace!(alias = %alias, previous = %previous, "Replaced earlier binding");
        }
    }

    /// Returns the binding for `alias`, if any.
    pub fn lookup(&self, alias: &str) -> Option<Binding> {
        self.bindings.get(alias).map(|entry| entry.value().clone())
    }

    /// Removes and returns the binding for `alias`.
    pub fn unbind(&self, alias: &str) -> Option<Binding> {
        self.bindings.remove(alias).map(|(_, binding)| binding)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(alias)
    }

    /// Returns the number of bound aliases.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bound aliases, sorted.
    pub fn aliases(&self) -> Vec<Alias> {
        let mut aliases: Vec<Alias> = self.bindings.iter().map(|e| e.key().clone()).collect();
        aliases.sort();
        aliases
    }
}
