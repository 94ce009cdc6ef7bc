//! External resolvers consulted before the container's own bindings.
//!
//! A [`Resolver`] either produces an instance for an alias or declines
//! with `Ok(None)` so the next resolver (and finally the container) gets a
//! turn. Returning `Err` aborts the whole `make` call.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::alias::Alias;
use crate::error::Result;
use crate::value::{Arguments, Instance};

/// Pluggable resolution strategy.
///
/// Resolvers only see the arguments by reference, so every resolver in the
/// chain observes the caller's original list.
///
/// Closures with the matching signature are resolvers too:
///
/// ```
/// use phi_container::prelude::*;
///
/// let container = Container::new();
/// container.add_resolver(|alias: &Alias, _args: &Arguments| -> Result<Option<Instance>> {
///     Ok((alias == "clock").then(|| Instance::new("Clock", 42u64)))
/// });
///
/// let clock = container.make("clock", Arguments::new()).unwrap();
/// assert_eq!(*clock.downcast::<u64>().unwrap(), 42);
/// ```
pub trait Resolver: Send + Sync {
    fn make(&self, alias: &Alias, arguments: &Arguments) -> Result<Option<Instance>>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Resolver for F
where
    F: Fn(&Alias, &Arguments) -> Result<Option<Instance>> + Send + Sync,
{
    fn make(&self, alias: &Alias, arguments: &Arguments) -> Result<Option<Instance>> {
        self(alias, arguments)
    }
}

/// Ordered list of resolvers. Registration order is consultation order.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: RwLock<Vec<Arc<dyn Resolver>>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver. Duplicates are kept.
    pub fn add(&self, resolver: Arc<dyn Resolver>) {
        debug!(resolver = resolver.name(), "Added resolver");
        self.resolvers.write().push(resolver);
    }

    /// Asks each resolver in turn; the first `Some` wins.
    ///
    /// The resolver list is snapshotted first so a resolver may add
    /// resolvers or call `make` without deadlocking.
    pub fn resolve(&self, alias: &Alias, arguments: &Arguments) -> Result<Option<Instance>> {
        let snapshot: Vec<Arc<dyn Resolver>> = self.resolvers.read().clone();

        for resolver in snapshot {
            if let Some(instance) = resolver.make(alias, arguments)? {
                debug!(alias = %alias, resolver = resolver.name(), "Resolved by external resolver");
                return Ok(Some(instance));
            }
            trace!(alias = %alias, resolver = resolver.name(), "Resolver declined");
        }

        Ok(None)
    }

    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .resolvers
            .read()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        f.debug_struct("ResolverChain").field("resolvers", &names).finish()
    }
}
