//! Resolution path tracking.
//!
//! Each top-level `make` call carries a [`ResolutionPath`]: the types
//! currently under construction, outermost first. Entering a type that is
//! already on the path means the type (transitively) depends on itself.

use std::collections::HashSet;

use tracing::warn;

use crate::alias::Alias;
use crate::error::{CyclicDependencyError, PhiError, Result};

/// Types currently being constructed by one `make` call.
#[derive(Debug, Default)]
pub(crate) struct ResolutionPath {
    /// Fast membership check
    active: HashSet<Alias>,
    /// Construction order (for error reporting)
    stack: Vec<Alias>,
    /// When false the path only records depth, never fails
    detect_cycles: bool,
}

impl ResolutionPath {
    pub fn new(detect_cycles: bool) -> Self {
        Self {
            detect_cycles,
            ..Self::default()
        }
    }

    /// Marks `type_name` as under construction.
    ///
    /// # Errors
    /// [`PhiError::CyclicDependency`] if it already is.
    pub fn enter(&mut self, type_name: &Alias) -> Result<()> {
        if self.detect_cycles && self.active.contains(type_name) {
            let start = self
                .stack
                .iter()
                .position(|t| t == type_name)
                .unwrap_or(0);

            let mut chain: Vec<Alias> = self.stack[start..].to_vec();
            chain.push(type_name.clone());

            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(PhiError::CyclicDependency(CyclicDependencyError { chain }));
        }

        self.active.insert(type_name.clone());
        self.stack.push(type_name.clone());
        Ok(())
    }

    /// Marks the innermost type as finished.
    pub fn leave(&mut self) {
        if let Some(done) = self.stack.pop() {
            // With detection off the same type may be on the stack twice.
            if !self.stack.contains(&done) {
                self.active.remove(&done);
            }
        }
    }

    /// The type currently being constructed, if any.
    pub fn current(&self) -> Option<&Alias> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
