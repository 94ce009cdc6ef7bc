//! # The Container — heart of Phi
//!
//! Turns an alias into an instance:
//!
//! ```text
//! make(alias, arguments)
//!   │
//!   ├─ resolver chain ──────── first Some(instance) wins
//!   │
//!   ├─ binding store
//!   │    ├─ Factory   ──────── factory(container, arguments)
//!   │    ├─ Instance  ──────── the shared instance
//!   │    └─ Type(name) ─┐
//!   │                   ▼
//!   └─ introspector: signature(name) → ParameterBinder → instantiate
//!                                            │
//!                                            └─ make(dependency, []) …
//! ```
//!
//! # Examples
//! ```rust
//! use phi_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Transport;
//! struct Mailer {
//!     transport: Arc<Transport>,
//!     sender: String,
//! }
//!
//! let container = Container::builder()
//!     .register_type(TypeDescriptor::new("Transport").constructor(|_| Ok(Transport)))
//!     .register_type(
//!         TypeDescriptor::new("Mailer")
//!             .param_typed("transport", "Transport")
//!             .param("sender")
//!             .constructor(|v| {
//!                 Ok(Mailer {
//!                     transport: v.object(0)?,
//!                     sender: v.str(1)?.to_string(),
//!                 })
//!             }),
//!     )
//!     .build();
//!
//! let mailer: Arc<Mailer> = container
//!     .make_as("Mailer", Arguments::new().with("noreply@example.com"))
//!     .expect("Failed to make Mailer");
//! assert_eq!(mailer.sender, "noreply@example.com");
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use phi_support::rendering::suggest_similar;
use tracing::{debug, instrument, trace, warn};

use crate::alias::Alias;
use crate::binder::ParameterBinder;
use crate::binding::Binding;
use crate::error::{PhiError, Result};
use crate::introspect::{Blueprint, Introspector, TypeDescriptor, TypeRegistry};
use crate::path::ResolutionPath;
use crate::provider::{Provider, ProviderRegistry};
use crate::resolver::{Resolver, ResolverChain};
use crate::store::BindingStore;
use crate::value::{Arguments, Instance, Values};

const MAX_SUGGESTIONS: usize = 3;

static INSTANCE: Lazy<Container> = Lazy::new(|| Container::builder().types(TypeRegistry::shared()).build());

// ============================================================
// ContainerBuilder
// ============================================================

/// Configures a [`Container`].
///
/// ```rust,ignore
/// let container = Container::builder()
///     .types(registry)
///     .detect_cycles(true)
///     .provider(&MailProvider)
///     .build();
/// ```
pub struct ContainerBuilder {
    types: Option<Arc<TypeRegistry>>,
    introspector: Option<Arc<dyn Introspector>>,
    detect_cycles: bool,
    descriptors: Vec<TypeDescriptor>,
    bindings: Vec<(Alias, Binding)>,
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            types: None,
            introspector: None,
            detect_cycles: true,
            descriptors: Vec::new(),
            bindings: Vec::new(),
            resolvers: Vec::new(),
        }
    }

    /// Use an existing type registry (e.g. [`TypeRegistry::shared`]).
    pub fn types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    /// Use a custom introspector instead of a [`TypeRegistry`].
    ///
    /// Type registrations are then ignored; the introspector owns
    /// every signature.
    pub fn introspector(mut self, introspector: impl Introspector + 'static) -> Self {
        self.introspector = Some(Arc::new(introspector));
        self
    }

    /// Fail with [`PhiError::CyclicDependency`] when a type depends on
    /// itself. On by default; without it such a type recurses until the
    /// stack overflows.
    pub fn detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    pub fn register_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn bind(mut self, alias: impl Into<Alias>, binding: impl Into<Binding>) -> Self {
        self.bindings.push((alias.into(), binding.into()));
        self
    }

    pub fn add_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Applies a [`Provider`] module.
    pub fn provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Applying provider");
        provider.register(&mut self);
        self
    }

    /// Builds the container.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Container {
        let (types, introspector): (Option<Arc<TypeRegistry>>, Arc<dyn Introspector>) =
            match self.introspector {
                Some(introspector) => {
                    if !self.descriptors.is_empty() {
                        warn!(
                            ignored = self.descriptors.len(),
                            "Custom introspector installed; type registrations ignored"
                        );
                    }
                    (None, introspector)
                }
                None => {
                    let types = self.types.unwrap_or_default();
                    for descriptor in self.descriptors {
                        types.register(descriptor);
                    }
                    let introspector: Arc<dyn Introspector> = types.clone();
                    (Some(types), introspector)
                }
            };

        let container = Container {
            bindings: BindingStore::new(),
            resolvers: ResolverChain::new(),
            types,
            introspector,
            detect_cycles: self.detect_cycles,
        };

        for (alias, binding) in self.bindings {
            container.bindings.bind(alias, binding);
        }
        for resolver in self.resolvers {
            container.resolvers.add(resolver);
        }

        debug!(
            bindings = container.bindings.len(),
            resolvers = container.resolvers.len(),
            detect_cycles = container.detect_cycles,
            "Container built"
        );
        container
    }
}

impl ProviderRegistry for ContainerBuilder {
    fn bind(&mut self, alias: Alias, binding: Binding) {
        self.bindings.push((alias, binding));
    }

    fn register_type(&mut self, descriptor: TypeDescriptor) {
        self.descriptors.push(descriptor);
    }

    fn add_resolver(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.push(resolver);
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Runtime dependency injection container.
///
/// `Send + Sync`; every method takes `&self`. No internal lock is held
/// while factories, resolvers or constructors run, so they may call back
/// into the same container.
pub struct Container {
    bindings: BindingStore,
    resolvers: ResolverChain,
    types: Option<Arc<TypeRegistry>>,
    introspector: Arc<dyn Introspector>,
    detect_cycles: bool,
}

impl Container {
    /// A container with its own empty type registry.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// The process-wide container, created on first access over
    /// [`TypeRegistry::shared`].
    pub fn instance() -> &'static Container {
        &INSTANCE
    }

    // ── Registration ──

    /// Binds `alias` to a type name, factory or instance, replacing any
    /// earlier binding.
    pub fn bind(&self, alias: impl Into<Alias>, binding: impl Into<Binding>) {
        self.bindings.bind(alias.into(), binding.into());
    }

    /// Binds `alias` to another type name.
    pub fn bind_type(&self, alias: impl Into<Alias>, target: impl Into<Alias>) {
        self.bind(alias, Binding::Type(target.into()));
    }

    /// Binds `alias` to a factory that receives the caller's arguments.
    pub fn bind_factory(
        &self,
        alias: impl Into<Alias>,
        factory: impl Fn(&Container, Arguments) -> Result<Instance> + Send + Sync + 'static,
    ) {
        self.bind(alias, Binding::factory(factory));
    }

    /// Binds `alias` to a shared instance.
    pub fn bind_instance(&self, alias: impl Into<Alias>, instance: Instance) {
        self.bind(alias, Binding::Instance(instance));
    }

    /// Removes the binding for `alias`.
    pub fn unbind(&self, alias: &str) -> Option<Binding> {
        self.bindings.unbind(alias)
    }

    /// Returns `true` if `alias` has a binding.
    pub fn is_bound(&self, alias: &str) -> bool {
        self.bindings.contains(alias)
    }

    /// Appends an external resolver; it is consulted after those added
    /// before it.
    pub fn add_resolver(&self, resolver: impl Resolver + 'static) {
        self.resolvers.add(Arc::new(resolver));
    }

    /// Describes a type in this container's registry.
    pub fn register_type(&self, descriptor: TypeDescriptor) {
        match &self.types {
            Some(types) => types.register(descriptor),
            None => warn!(
                type_name = %descriptor.name(),
                "Custom introspector installed; type registration ignored"
            ),
        }
    }

    /// Applies a [`Provider`] module.
    pub fn register_provider(&self, provider: &dyn Provider) {
        debug!(provider = provider.name(), "Applying provider");
        let mut registry = self;
        provider.register(&mut registry);
    }

    /// The type registry, unless a custom introspector is installed.
    pub fn types(&self) -> Option<&Arc<TypeRegistry>> {
        self.types.as_ref()
    }

    // ── Resolution ──

    /// Gets or creates an instance of `alias`.
    ///
    /// # Errors
    /// - [`PhiError::UnresolvableType`] — no such type
    /// - [`PhiError::NotInstantiable`] — abstract type without a binding
    /// - [`PhiError::MissingArgument`] — not enough positional arguments
    /// - [`PhiError::CyclicDependency`] — the type depends on itself
    /// - whatever a resolver, factory or constructor returns
    pub fn make(&self, alias: impl Into<Alias>, arguments: Arguments) -> Result<Instance> {
        let alias = alias.into();
        let mut path = ResolutionPath::new(self.detect_cycles);
        self.make_in(&alias, arguments, &mut path)
    }

    /// [`make`](Self::make) without arguments.
    pub fn resolve(&self, alias: impl Into<Alias>) -> Result<Instance> {
        self.make(alias, Arguments::new())
    }

    /// [`make`](Self::make), then downcast to `T`.
    ///
    /// ```rust,ignore
    /// let mailer: Arc<Mailer> = container.make_as("Mailer", Arguments::new())?;
    /// ```
    pub fn make_as<T: Send + Sync + 'static>(
        &self,
        alias: impl Into<Alias>,
        arguments: Arguments,
    ) -> Result<Arc<T>> {
        let alias = alias.into();
        let instance = self.make(&alias, arguments)?;
        instance.downcast::<T>().ok_or(PhiError::TypeMismatch {
            alias,
            expected: type_name::<T>(),
        })
    }

    /// [`make_as`](Self::make_as) without arguments.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, alias: impl Into<Alias>) -> Result<Arc<T>> {
        self.make_as(alias, Arguments::new())
    }

    #[instrument(level = "debug", skip(self, alias, arguments, path), fields(alias = %alias, depth = path.depth()))]
    fn make_in(&self, alias: &Alias, arguments: Arguments, path: &mut ResolutionPath) -> Result<Instance> {
        if let Some(instance) = self.resolvers.resolve(alias, &arguments)? {
            return Ok(instance);
        }

        let target = match self.bindings.lookup(alias.as_str()) {
            Some(binding) => {
                trace!(alias = %alias, kind = binding.kind(), "Found binding");
                match binding {
                    Binding::Factory(factory) => return factory(self, arguments),
                    Binding::Instance(instance) => return Ok(instance),
                    Binding::Type(target) => target,
                }
            }
            None => alias.clone(),
        };

        self.build(&target, arguments, path)
    }

    fn build(&self, type_name: &Alias, arguments: Arguments, path: &mut ResolutionPath) -> Result<Instance> {
        let blueprint = self
            .introspector
            .blueprint(type_name)
            .map_err(|err| self.diagnose(err, path))?;

        path.enter(type_name)?;
        let built = self.construct(type_name, &blueprint, arguments, path);
        path.leave();

        if built.is_ok() {
            debug!(type_name = %type_name, "Constructed");
        }
        built
    }

    fn construct(
        &self,
        type_name: &Alias,
        blueprint: &Blueprint<'_>,
        arguments: Arguments,
        path: &mut ResolutionPath,
    ) -> Result<Instance> {
        let parameters = blueprint.parameters();
        let values = if parameters.is_empty() {
            Values::empty()
        } else {
            ParameterBinder::new(type_name, parameters).bind(
                arguments,
                |instance, declared| self.introspector.is_instance_of(instance, declared),
                |declared| self.make_in(declared, Arguments::new(), path),
            )?
        };

        blueprint.instantiate(values)
    }

    /// Names the consumer of an unknown type and adds similar bound
    /// aliases to its suggestions.
    fn diagnose(&self, err: PhiError, path: &ResolutionPath) -> PhiError {
        match err.required_by(path.current()) {
            PhiError::UnresolvableType(mut err) => {
                let bound = self.bindings.aliases();
                for suggestion in suggest_similar(err.requested.as_str(), &bound, MAX_SUGGESTIONS) {
                    if err.suggestions.len() >= MAX_SUGGESTIONS {
                        break;
                    }
                    if !err.suggestions.contains(&suggestion) {
                        err.suggestions.push(suggestion);
                    }
                }
                PhiError::UnresolvableType(err)
            }
            other => other,
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry for &Container {
    fn bind(&mut self, alias: Alias, binding: Binding) {
        self.bindings.bind(alias, binding);
    }

    fn register_type(&mut self, descriptor: TypeDescriptor) {
        Container::register_type(*self, descriptor);
    }

    fn add_resolver(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.add(resolver);
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings.len())
            .field("resolvers", &self.resolvers.len())
            .field("types", &self.types.as_ref().map(|t| t.len()))
            .field("detect_cycles", &self.detect_cycles)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::alias::Alias;
    pub use crate::binding::Binding;
    pub use crate::error::{PhiError, Result};
    pub use crate::introspect::{
        Blueprint, Introspector, ParameterDescriptor, TypeDescriptor, TypeRegistration, TypeRegistry,
    };
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::resolver::Resolver;
    pub use crate::value::{Arguments, Instance, Scalar, Value, Values};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::ParameterDescriptor;
    use crate::value::{Scalar, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // === Fixture types ===

    #[derive(Debug)]
    struct A;

    #[derive(Debug)]
    struct B {
        a: Arc<A>,
    }

    struct NoConstructor;

    struct TypedConstructor {
        a: Arc<A>,
        b: Arc<B>,
    }

    struct ScalarConstructor {
        val1: Scalar,
        val2: Scalar,
    }

    struct MixedConstructor {
        a: Arc<A>,
        val1: String,
        b: Arc<B>,
        val2: String,
    }

    struct DoubleDependencyConstructor {
        a: Arc<A>,
        b1: Arc<B>,
        b2: Arc<B>,
    }

    struct Loop;

    fn fixture_types() -> TypeRegistry {
        let types = TypeRegistry::new();
        types.register(TypeDescriptor::new("A").constructor(|_| Ok(A)));
        types.register(
            TypeDescriptor::new("B")
                .param_typed("a", "A")
                .constructor(|v| Ok(B { a: v.object(0)? })),
        );
        types.register(TypeDescriptor::new("NoConstructor").constructor(|_| Ok(NoConstructor)));
        types.register(TypeDescriptor::new("Uninstantiable"));
        types.register(
            TypeDescriptor::new("TypedConstructor")
                .param_typed("a", "A")
                .param_typed("b", "B")
                .constructor(|v| {
                    Ok(TypedConstructor {
                        a: v.object(0)?,
                        b: v.object(1)?,
                    })
                }),
        );
        types.register(
            TypeDescriptor::new("ScalarConstructor")
                .param("val1")
                .param("val2")
                .constructor(|v| {
                    Ok(ScalarConstructor {
                        val1: v.scalar(0)?.clone(),
                        val2: v.scalar(1)?.clone(),
                    })
                }),
        );
        types.register(
            TypeDescriptor::new("MixedConstructor")
                .param_typed("a", "A")
                .param("val1")
                .param_typed("b", "B")
                .param("val2")
                .constructor(|v| {
                    Ok(MixedConstructor {
                        a: v.object(0)?,
                        val1: v.str(1)?.to_string(),
                        b: v.object(2)?,
                        val2: v.str(3)?.to_string(),
                    })
                }),
        );
        types.register(
            TypeDescriptor::new("DoubleDependencyConstructor")
                .param_typed("a", "A")
                .param_typed("b1", "B")
                .param_typed("b2", "B")
                .constructor(|v| {
                    Ok(DoubleDependencyConstructor {
                        a: v.object(0)?,
                        b1: v.object(1)?,
                        b2: v.object(2)?,
                    })
                }),
        );
        types
    }

    fn container() -> Container {
        Container::builder().types(Arc::new(fixture_types())).build()
    }

    fn str_of(scalar: &Scalar) -> &str {
        match scalar {
            Scalar::Str(s) => s,
            other => panic!("Expected string, got: {other:?}"),
        }
    }

    // === make ===

    #[test]
    fn no_constructor_makes_fresh_instances() {
        let container = container();

        let first = container.resolve("NoConstructor").unwrap();
        let second = container.resolve("NoConstructor").unwrap();

        assert!(first.is::<NoConstructor>());
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn alias_to_type_name() {
        let container = container();
        container.bind("test", "NoConstructor");

        let instance = container.resolve("test").unwrap();
        assert!(instance.is::<NoConstructor>());
        assert_eq!(instance.type_name(), "NoConstructor");
    }

    #[test]
    fn factory_receives_arguments_verbatim() {
        let container = container();
        let calls = Arc::new(AtomicUsize::new(0));

        container.bind_factory("test", {
            let calls = calls.clone();
            move |_, args| {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(args.len(), 2);
                assert!(matches!(args.at(0), Some(Value::Scalar(Scalar::Str(s))) if s == "param1"));
                assert!(matches!(args.at(1), Some(Value::Scalar(Scalar::Str(s))) if s == "param2"));
                Ok(Instance::new("NoConstructor", NoConstructor))
            }
        });

        let instance = container
            .make("test", Arguments::new().with("param1").with("param2"))
            .unwrap();

        assert!(instance.is::<NoConstructor>());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn factory_can_make_through_container() {
        let container = container();
        container.bind_factory("typed.default", |c, _| c.resolve("TypedConstructor"));

        let instance = container.resolve("typed.default").unwrap();
        assert!(instance.is::<TypedConstructor>());
    }

    #[test]
    fn factory_error_propagates() {
        let container = container();
        container.bind_factory("broken", |_, _| Err(PhiError::construction("broken", "nope")));

        assert!(matches!(
            container.resolve("broken"),
            Err(PhiError::ConstructionFailed { .. })
        ));
    }

    #[test]
    fn instance_binding_is_singleton() {
        let container = container();
        let shared = Instance::new("NoConstructor", NoConstructor);
        container.bind_instance("test", shared.clone());

        let first = container.resolve("test").unwrap();
        let second = container.make("test", Arguments::new().with("ignored")).unwrap();

        assert!(first.ptr_eq(&shared));
        assert!(second.ptr_eq(&shared));
    }

    #[test]
    fn rebinding_overwrites() {
        let container = container();
        container.bind("test", "NoConstructor");
        container.bind("test", "A");

        assert!(container.resolve("test").unwrap().is::<A>());
    }

    #[test]
    fn uninstantiable_fails() {
        let container = container();

        match container.resolve("Uninstantiable").unwrap_err() {
            PhiError::NotInstantiable { type_name } => assert_eq!(type_name, "Uninstantiable"),
            other => panic!("Expected NotInstantiable, got: {other:?}"),
        }
    }

    #[test]
    fn abstract_type_bound_to_concrete() {
        let container = container();
        container.bind("Uninstantiable", "NoConstructor");

        assert!(container.resolve("Uninstantiable").unwrap().is::<NoConstructor>());
    }

    #[test]
    fn unknown_type_is_unresolvable() {
        let container = container();

        match container.resolve("NoConstrutor").unwrap_err() {
            PhiError::UnresolvableType(err) => {
                assert_eq!(err.requested, "NoConstrutor");
                assert!(err.required_by.is_none());
                assert!(err.suggestions.contains(&"NoConstructor".to_string()));
            }
            other => panic!("Expected UnresolvableType, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_dependency_names_its_consumer() {
        let container = container();
        container.register_type(
            TypeDescriptor::new("NeedsGhost")
                .param_typed("ghost", "Ghost")
                .constructor(|_| Ok(())),
        );

        match container.resolve("NeedsGhost").unwrap_err() {
            PhiError::UnresolvableType(err) => {
                assert_eq!(err.requested, "Ghost");
                assert_eq!(err.required_by, Some(Alias::new("NeedsGhost")));
            }
            other => panic!("Expected UnresolvableType, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_alias_suggests_bound_aliases() {
        let container = container();
        container.bind("mail.transport", "NoConstructor");

        match container.resolve("mail.transprot").unwrap_err() {
            PhiError::UnresolvableType(err) => {
                assert!(err.suggestions.contains(&"mail.transport".to_string()));
            }
            other => panic!("Expected UnresolvableType, got: {other:?}"),
        }
    }

    #[test]
    fn reregistration_during_build_keeps_old_constructor() {
        struct Trigger;
        struct Swapped {
            trigger: Arc<Trigger>,
        }

        let types = Arc::new(fixture_types());
        let weak = Arc::downgrade(&types);
        types.register(TypeDescriptor::new("Trigger").constructor(move |_| {
            if let Some(types) = weak.upgrade() {
                types.register(
                    TypeDescriptor::new("Swapped")
                        .param("label")
                        .constructor(|v| Ok(v.str(0)?.to_string())),
                );
            }
            Ok(Trigger)
        }));
        types.register(
            TypeDescriptor::new("Swapped")
                .param_typed("trigger", "Trigger")
                .constructor(|v| Ok(Swapped { trigger: v.object(0)? })),
        );

        let container = Container::builder().types(types).build();

        // Built with the registration seen when the build started
        let swapped: Arc<Swapped> = container.resolve_as("Swapped").unwrap();
        assert_eq!(Arc::strong_count(&swapped.trigger), 1);

        // Later builds see the replacement
        let label: Arc<String> = container
            .make_as("Swapped", Arguments::new().with("late"))
            .unwrap();
        assert_eq!(label.as_str(), "late");
    }

    #[test]
    fn scalar_parameters() {
        let container = container();
        let instance: Arc<ScalarConstructor> = container
            .make_as("ScalarConstructor", Arguments::new().with("a").with("b"))
            .unwrap();

        assert_eq!(str_of(&instance.val1), "a");
        assert_eq!(str_of(&instance.val2), "b");
    }

    #[test]
    fn named_argument_precedence() {
        let container = container();
        let instance: Arc<ScalarConstructor> = container
            .make_as(
                "ScalarConstructor",
                Arguments::new().with_named("val2", "x").with("y"),
            )
            .unwrap();

        assert_eq!(str_of(&instance.val1), "y");
        assert_eq!(str_of(&instance.val2), "x");
    }

    #[test]
    fn missing_argument_fails() {
        let container = container();

        match container
            .make("ScalarConstructor", Arguments::new().with("a"))
            .unwrap_err()
        {
            PhiError::MissingArgument {
                type_name,
                parameter,
                position,
            } => {
                assert_eq!(type_name, "ScalarConstructor");
                assert_eq!(parameter, "val2");
                assert_eq!(position, 1);
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
    }

    #[test]
    fn misnamed_argument_is_dropped() {
        let container = container();
        let result = container.make(
            "ScalarConstructor",
            Arguments::new().with_named("val3", "x").with("a"),
        );

        assert!(matches!(result, Err(PhiError::MissingArgument { .. })));
    }

    #[test]
    fn auto_injection() {
        let container = container();
        let instance: Arc<TypedConstructor> = container.resolve_as("TypedConstructor").unwrap();

        // B's own A is a different, freshly made A
        assert!(!Arc::ptr_eq(&instance.a, &instance.b.a));
    }

    #[test]
    fn auto_injection_partial_override() {
        let container = container();
        let b = container.resolve("B").unwrap();

        let instance: Arc<TypedConstructor> = container
            .make_as("TypedConstructor", Arguments::new().with(&b))
            .unwrap();

        assert!(Arc::ptr_eq(&instance.b, &b.downcast::<B>().unwrap()));
    }

    #[test]
    fn auto_injection_full_override() {
        let container = container();
        let a = container.resolve("A").unwrap();
        let b = container.make("B", Arguments::new().with(&a)).unwrap();

        // Supplied out of declaration order on purpose
        let instance: Arc<TypedConstructor> = container
            .make_as("TypedConstructor", Arguments::new().with(&b).with(&a))
            .unwrap();

        let a = a.downcast::<A>().unwrap();
        assert!(Arc::ptr_eq(&instance.a, &a));
        assert!(Arc::ptr_eq(&instance.b, &b.downcast::<B>().unwrap()));
        assert!(Arc::ptr_eq(&instance.b.a, &a));
    }

    #[test]
    fn unordered_interleaved_injection() {
        let container = container();
        let b = container.resolve("B").unwrap();

        let instance: Arc<MixedConstructor> = container
            .make_as(
                "MixedConstructor",
                Arguments::new().with("test1").with("test2").with(&b),
            )
            .unwrap();

        assert!(Arc::ptr_eq(&instance.b, &b.downcast::<B>().unwrap()));
        assert_eq!(instance.val1, "test1");
        assert_eq!(instance.val2, "test2");
        assert!(!Arc::ptr_eq(&instance.a, &instance.b.a));
    }

    #[test]
    fn multiple_injections_of_one_type() {
        let container = container();
        let instance: Arc<DoubleDependencyConstructor> =
            container.resolve_as("DoubleDependencyConstructor").unwrap();

        assert!(!Arc::ptr_eq(&instance.b1, &instance.b2));
        assert!(!Arc::ptr_eq(&instance.a, &instance.b1.a));
    }

    #[test]
    fn multiple_injections_with_one_override() {
        let container = container();
        let b = container.resolve("B").unwrap();
        let b_arc = b.downcast::<B>().unwrap();

        let instance: Arc<DoubleDependencyConstructor> = container
            .make_as("DoubleDependencyConstructor", Arguments::new().with(&b))
            .unwrap();

        assert!(!Arc::ptr_eq(&instance.b1, &instance.b2));
        let overridden = [&instance.b1, &instance.b2]
            .into_iter()
            .filter(|x| Arc::ptr_eq(x, &b_arc))
            .count();
        assert_eq!(overridden, 1);
    }

    #[test]
    fn multiple_injections_with_overrides() {
        let container = container();
        let b = container.resolve("B").unwrap();

        let instance: Arc<DoubleDependencyConstructor> = container
            .make_as(
                "DoubleDependencyConstructor",
                Arguments::new().with(&b).with(&b),
            )
            .unwrap();

        assert!(Arc::ptr_eq(&instance.b1, &instance.b2));
    }

    #[test]
    fn multiple_injections_of_bound_instance() {
        let container = container();
        let b = container.resolve("B").unwrap();
        container.bind("B", b);

        let instance: Arc<DoubleDependencyConstructor> =
            container.resolve_as("DoubleDependencyConstructor").unwrap();

        assert!(Arc::ptr_eq(&instance.b1, &instance.b2));
    }

    #[test]
    fn interface_parameters() {
        struct Greeter {
            greeting: &'static str,
        }

        let container = container();
        container.register_type(TypeDescriptor::new("Greeting"));
        container.register_type(
            TypeDescriptor::new("Hello")
                .implements("Greeting")
                .constructor(|_| Ok("hello")),
        );
        container.register_type(
            TypeDescriptor::new("Greeter")
                .param_typed("greeting", "Greeting")
                .constructor(|v| {
                    Ok(Greeter {
                        greeting: *v.object::<&'static str>(0)?,
                    })
                }),
        );

        // No binding for the interface yet
        assert!(matches!(
            container.resolve("Greeter"),
            Err(PhiError::NotInstantiable { .. })
        ));

        // A subtype instance satisfies the interface by type
        let hello = container.resolve("Hello").unwrap();
        let greeter: Arc<Greeter> = container.make_as("Greeter", Arguments::new().with(&hello)).unwrap();
        assert_eq!(greeter.greeting, "hello");

        // Binding the interface enables auto-injection
        container.bind("Greeting", "Hello");
        let greeter: Arc<Greeter> = container.resolve_as("Greeter").unwrap();
        assert_eq!(greeter.greeting, "hello");
    }

    #[test]
    fn make_as_type_mismatch() {
        let container = container();

        match container.resolve_as::<B>("A").unwrap_err() {
            PhiError::TypeMismatch { alias, .. } => assert_eq!(alias, "A"),
            other => panic!("Expected TypeMismatch, got: {other:?}"),
        }
    }

    // === resolvers ===

    #[test]
    fn resolver_short_circuits() {
        let container = container();
        let calls = Arc::new(AtomicUsize::new(0));
        container.bind_factory("A", {
            let calls = calls.clone();
            move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Instance::new("A", A))
            }
        });

        let from_resolver = Instance::new("A", A);
        container.add_resolver({
            let from_resolver = from_resolver.clone();
            move |alias: &Alias, _: &Arguments| -> Result<Option<Instance>> {
                Ok((alias == "A").then(|| from_resolver.clone()))
            }
        });

        assert!(container.resolve("A").unwrap().ptr_eq(&from_resolver));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn declining_resolver_lets_container_continue() {
        let container = container();
        let asked = Arc::new(AtomicUsize::new(0));
        container.add_resolver({
            let asked = asked.clone();
            move |_: &Alias, _: &Arguments| -> Result<Option<Instance>> {
                asked.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
        });

        let instance: Arc<TypedConstructor> = container.resolve_as("TypedConstructor").unwrap();
        assert!(!Arc::ptr_eq(&instance.a, &instance.b.a));

        // TypedConstructor, A, B, and B's A
        assert_eq!(asked.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn resolver_intercepts_dependencies() {
        let container = container();
        let shared_a = Instance::new("A", A);
        container.add_resolver({
            let shared_a = shared_a.clone();
            move |alias: &Alias, _: &Arguments| -> Result<Option<Instance>> {
                Ok((alias == "A").then(|| shared_a.clone()))
            }
        });

        let instance: Arc<TypedConstructor> = container.resolve_as("TypedConstructor").unwrap();
        assert!(Arc::ptr_eq(&instance.a, &instance.b.a));
    }

    #[test]
    fn resolver_error_aborts_make() {
        let container = container();
        container.add_resolver(|alias: &Alias, _: &Arguments| -> Result<Option<Instance>> {
            Err(PhiError::construction(alias, "registry offline"))
        });

        assert!(matches!(
            container.resolve("A"),
            Err(PhiError::ConstructionFailed { .. })
        ));
    }

    // === cycles ===

    #[test]
    fn cyclic_dependency_detected() {
        let container = container();
        container.register_type(
            TypeDescriptor::new("Chicken")
                .param_typed("egg", "Egg")
                .constructor(|_| Ok(Loop)),
        );
        container.register_type(
            TypeDescriptor::new("Egg")
                .param_typed("chicken", "Chicken")
                .constructor(|_| Ok(Loop)),
        );

        match container.resolve("Chicken").unwrap_err() {
            PhiError::CyclicDependency(err) => {
                assert_eq!(
                    err.chain,
                    vec![Alias::new("Chicken"), Alias::new("Egg"), Alias::new("Chicken")]
                );
            }
            other => panic!("Expected CyclicDependency, got: {other:?}"),
        }
    }

    #[test]
    fn cycle_broken_by_explicit_argument() {
        let container = container();
        container.register_type(
            TypeDescriptor::new("Node")
                .param_typed("next", "Node")
                .constructor(|_| Ok(Loop)),
        );

        let tail = Instance::new("Node", Loop);
        assert!(container.make("Node", Arguments::new().with(&tail)).is_ok());
        assert!(matches!(
            container.resolve("Node"),
            Err(PhiError::CyclicDependency(_))
        ));
    }

    // === providers / global / threads ===

    struct FixtureProvider;

    impl Provider for FixtureProvider {
        fn register(&self, registry: &mut dyn ProviderRegistry) {
            registry.register_type(TypeDescriptor::new("A").constructor(|_| Ok(A)));
            registry.bind(Alias::new("first"), Binding::from("A"));
        }
    }

    #[test]
    fn provider_on_builder_and_container() {
        let built = Container::builder().provider(&FixtureProvider).build();
        assert!(built.resolve("first").unwrap().is::<A>());

        let live = Container::new();
        live.register_provider(&FixtureProvider);
        assert!(live.is_bound("first"));
        assert!(live.resolve("first").unwrap().is::<A>());
    }

    #[test]
    fn global_instance_is_shared() {
        let first = Container::instance();
        let second = Container::instance();
        assert!(std::ptr::eq(first, second));

        first.bind_instance("global.test", Instance::new("NoConstructor", NoConstructor));
        assert!(second.is_bound("global.test"));
        assert!(second.unbind("global.test").is_some());
    }

    #[test]
    fn concurrent_make() {
        let container = container();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        let made: Arc<DoubleDependencyConstructor> =
                            container.resolve_as("DoubleDependencyConstructor").unwrap();
                        assert!(!Arc::ptr_eq(&made.b1, &made.b2));
                    }
                });
            }
        });
    }

    #[test]
    fn custom_introspector() {
        struct OnlyUnit;

        impl Introspector for OnlyUnit {
            fn signature(&self, _: &Alias) -> Result<Vec<ParameterDescriptor>> {
                Ok(Vec::new())
            }

            fn instantiate(&self, type_name: &Alias, _: Values) -> Result<Instance> {
                Ok(Instance::new(type_name, ()))
            }

            fn is_instance_of(&self, instance: &Instance, declared: &Alias) -> bool {
                instance.type_name() == declared
            }
        }

        let container = Container::builder().introspector(OnlyUnit).build();
        assert!(container.types().is_none());
        assert_eq!(container.resolve("Anything").unwrap().type_name(), "Anything");
    }

    #[test]
    fn debug_display() {
        let container = container();
        container.bind("x", "A");

        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("bindings: 1"));
    }
}
