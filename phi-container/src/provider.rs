//! Provider trait — a module of related registrations.
//!
//! Providers group the bindings, types and resolvers of one area of an
//! application so the composition root stays short:
//!
//! ```rust,ignore
//! container.register_provider(&MailProvider);
//! container.register_provider(&StorageProvider);
//! ```

use std::sync::Arc;

use crate::alias::Alias;
use crate::binding::Binding;
use crate::introspect::TypeDescriptor;
use crate::resolver::Resolver;

/// A module that registers related dependencies into a container.
pub trait Provider: Send + Sync {
    /// Registers everything this provider offers.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The registration surface a [`Provider`] sees.
///
/// Implemented by [`Container`](crate::container::Container) and by
/// [`ContainerBuilder`](crate::container::ContainerBuilder); providers can
/// be tested against a mock.
pub trait ProviderRegistry {
    /// Binds an alias (see [`Binding`]).
    fn bind(&mut self, alias: Alias, binding: Binding);

    /// Describes a constructible (or abstract) type.
    fn register_type(&mut self, descriptor: TypeDescriptor);

    /// Appends an external resolver.
    fn add_resolver(&mut self, resolver: Arc<dyn Resolver>);
}
