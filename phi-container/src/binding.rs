//! Bindings: what an alias resolves to.
//!
//! - [`Binding::Type`] — instantiate another type instead
//! - [`Binding::Factory`] — call a function with the caller's arguments
//! - [`Binding::Instance`] — hand out one shared object every time

use std::fmt;
use std::sync::Arc;

use crate::alias::Alias;
use crate::container::Container;
use crate::error::Result;
use crate::value::{Arguments, Instance};

/// A factory bound to an alias.
///
/// Receives the container (so it can `make` its own dependencies) and the
/// caller's arguments exactly as they were passed to `make`.
pub type FactoryFn = Arc<dyn Fn(&Container, Arguments) -> Result<Instance> + Send + Sync>;

/// The rule associated with an alias.
#[derive(Clone)]
pub enum Binding {
    /// Redirect to another type name.
    ///
    /// The target is instantiated directly; its own bindings are not
    /// consulted again.
    Type(Alias),

    /// Build through a function.
    ///
    /// Arguments are forwarded verbatim, without auto-injection.
    Factory(FactoryFn),

    /// Always return this object.
    ///
    /// Identity is shared: every `make` returns a handle to the same object.
    Instance(Instance),
}

impl Binding {
    /// Creates a factory binding from a closure.
    pub fn factory(
        factory: impl Fn(&Container, Arguments) -> Result<Instance> + Send + Sync + 'static,
    ) -> Self {
        Binding::Factory(Arc::new(factory))
    }

    /// Returns `true` if every resolution yields the same object.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Binding::Instance(_))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Type(_) => "type",
            Binding::Factory(_) => "factory",
            Binding::Instance(_) => "instance",
        }
    }
}

impl From<Instance> for Binding {
    fn from(instance: Instance) -> Self {
        Binding::Instance(instance)
    }
}

impl From<Alias> for Binding {
    fn from(target: Alias) -> Self {
        Binding::Type(target)
    }
}

impl From<&str> for Binding {
    fn from(target: &str) -> Self {
        Binding::Type(Alias::new(target))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Type(target) => f.debug_tuple("Type").field(target).finish(),
            Binding::Factory(_) => f.write_str("Factory(..)"),
            Binding::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Type(target) => write!(f, "type {target}"),
            Binding::Factory(_) => write!(f, "factory"),
            Binding::Instance(instance) => write!(f, "instance of {}", instance.type_name()),
        }
    }
}
