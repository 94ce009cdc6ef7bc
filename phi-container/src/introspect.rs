//! Constructor introspection.
//!
//! Rust has no runtime reflection, so the container asks an
//! [`Introspector`] for three things about a type name:
//! - its constructor signature ([`ParameterDescriptor`]s in declaration order)
//! - how to build it from a resolved [`Values`] vector
//! - whether an existing [`Instance`] satisfies it (same type or subtype)
//!
//! [`TypeRegistry`] is the stock implementation: an explicit table of
//! [`TypeDescriptor`]s filled at startup, by hand or through
//! [`inventory`] submissions of [`TypeRegistration`].
//!
//! # Examples
//! ```
//! use phi_container::prelude::*;
//!
//! struct Transport;
//! struct Mailer {
//!     transport: std::sync::Arc<Transport>,
//!     sender: String,
//! }
//!
//! let types = TypeRegistry::new();
//! types.register(TypeDescriptor::new("Transport").constructor(|_| Ok(Transport)));
//! types.register(
//!     TypeDescriptor::new("Mailer")
//!         .param_typed("transport", "Transport")
//!         .param("sender")
//!         .constructor(|v| {
//!             Ok(Mailer {
//!                 transport: v.object(0)?,
//!                 sender: v.str(1)?.to_string(),
//!             })
//!         }),
//! );
//!
//! let signature = types.signature(&Alias::new("Mailer")).unwrap();
//! assert_eq!(signature.len(), 2);
//! assert_eq!(signature[1].position, 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use phi_support::rendering::suggest_similar;
use tracing::{debug, trace};

use crate::alias::Alias;
use crate::error::{PhiError, Result, UnresolvableTypeError};
use crate::value::{Instance, Values};

/// How the container learns about constructors.
pub trait Introspector: Send + Sync {
    /// Constructor parameters of `type_name`, in declaration order.
    ///
    /// # Errors
    /// - [`PhiError::UnresolvableType`] — the type is unknown
    /// - [`PhiError::NotInstantiable`] — the type is abstract
    fn signature(&self, type_name: &Alias) -> Result<Vec<ParameterDescriptor>>;

    /// Builds `type_name` from a fully resolved argument vector.
    fn instantiate(&self, type_name: &Alias, values: Values) -> Result<Instance>;

    /// Returns `true` if `instance` may fill a parameter declared as
    /// `declared`.
    fn is_instance_of(&self, instance: &Instance, declared: &Alias) -> bool;

    /// Signature and constructor of `type_name` taken together, so one
    /// build never mixes the parameters of one registration with the
    /// constructor of another.
    ///
    /// The default pairs [`signature`](Self::signature) with
    /// [`instantiate`](Self::instantiate); introspectors whose types can
    /// change at runtime should override it.
    fn blueprint(&self, type_name: &Alias) -> Result<Blueprint<'_>> {
        let parameters = self.signature(type_name)?;
        let type_name = type_name.clone();
        Ok(Blueprint::new(parameters, move |values| {
            self.instantiate(&type_name, values)
        }))
    }
}

/// Parameters of one type plus the means to build it.
pub struct Blueprint<'a> {
    parameters: Vec<ParameterDescriptor>,
    build: Box<dyn Fn(Values) -> Result<Instance> + 'a>,
}

impl<'a> Blueprint<'a> {
    pub fn new(
        parameters: Vec<ParameterDescriptor>,
        build: impl Fn(Values) -> Result<Instance> + 'a,
    ) -> Self {
        Self {
            parameters,
            build: Box::new(build),
        }
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn instantiate(&self, values: Values) -> Result<Instance> {
        (self.build)(values)
    }
}

impl fmt::Debug for Blueprint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════
// Descriptors
// ═══════════════════════════════════════════

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Present only for object-typed parameters.
    pub declared_type: Option<Alias>,
    /// 0-based declaration index.
    pub position: usize,
}

impl ParameterDescriptor {
    pub fn untyped(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            position,
        }
    }

    pub fn typed(name: impl Into<String>, declared_type: impl Into<Alias>, position: usize) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            position,
        }
    }
}

/// Builds an instance from its resolved constructor arguments.
pub type ConstructorFn = Arc<dyn Fn(&Values) -> Result<Instance> + Send + Sync>;

/// Everything the registry knows about one type.
///
/// A descriptor without a constructor describes an abstract type: it can
/// appear as a declared parameter type or a supertype, but `make` on it
/// fails with [`PhiError::NotInstantiable`].
#[derive(Clone)]
pub struct TypeDescriptor {
    name: Alias,
    parameters: Vec<ParameterDescriptor>,
    supertypes: Vec<Alias>,
    constructor: Option<ConstructorFn>,
}

impl TypeDescriptor {
    /// Starts describing the type `name`. Abstract until a constructor is set.
    pub fn new(name: impl Into<Alias>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            supertypes: Vec::new(),
            constructor: None,
        }
    }

    /// Describes `T` under its conventional alias ([`Alias::of`]).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(Alias::of::<T>())
    }

    /// Appends an untyped (scalar) parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        let position = self.parameters.len();
        self.parameters.push(ParameterDescriptor::untyped(name, position));
        self
    }

    /// Appends a parameter declared as `declared_type`.
    pub fn param_typed(mut self, name: impl Into<String>, declared_type: impl Into<Alias>) -> Self {
        let position = self.parameters.len();
        self.parameters
            .push(ParameterDescriptor::typed(name, declared_type, position));
        self
    }

    /// Appends a parameter declared as `T`'s conventional alias.
    pub fn param_of<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.param_typed(name, Alias::of::<T>())
    }

    /// Declares that instances of this type also satisfy `supertype`.
    pub fn implements(mut self, supertype: impl Into<Alias>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Sets the constructor, making the type instantiable.
    ///
    /// The built value is wrapped as an [`Instance`] named after this type.
    pub fn constructor<T, F>(mut self, build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Values) -> Result<T> + Send + Sync + 'static,
    {
        let name = self.name.clone();
        self.constructor = Some(Arc::new(move |values: &Values| {
            Ok(Instance::new(name.clone(), build(values)?))
        }));
        self
    }

    #[inline]
    pub fn name(&self) -> &Alias {
        &self.name
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    #[inline]
    pub fn supertypes(&self) -> &[Alias] {
        &self.supertypes
    }

    #[inline]
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("supertypes", &self.supertypes)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Link-time registration
// ═══════════════════════════════════════════

/// A type description submitted at link time with [`inventory::submit!`].
///
/// Every submission is loaded into [`TypeRegistry::shared`] on first use.
///
/// ```rust,ignore
/// fn describe_clock() -> TypeDescriptor {
///     TypeDescriptor::new("Clock").constructor(|_| Ok(SystemClock))
/// }
///
/// phi_container::inventory::submit! {
///     TypeRegistration::new(describe_clock)
/// }
/// ```
pub struct TypeRegistration {
    describe: fn() -> TypeDescriptor,
}

impl TypeRegistration {
    pub const fn new(describe: fn() -> TypeDescriptor) -> Self {
        Self { describe }
    }

    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

inventory::collect!(TypeRegistration);

static SHARED_TYPES: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::from_inventory()));

// ═══════════════════════════════════════════
// TypeRegistry
// ═══════════════════════════════════════════

/// Explicit table of type descriptors; the default [`Introspector`].
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<Alias, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`TypeRegistration`] submitted
    /// through `inventory`.
    pub fn from_inventory() -> Self {
        let registry = Self::new();
        for registration in inventory::iter::<TypeRegistration> {
            registry.register(registration.describe());
        }
        debug!(types = registry.len(), "Loaded link-time type registrations");
        registry
    }

    /// The process-wide registry behind [`Container::instance`].
    ///
    /// [`Container::instance`]: crate::container::Container::instance
    pub fn shared() -> Arc<TypeRegistry> {
        SHARED_TYPES.clone()
    }

    /// Adds or replaces a type description.
    pub fn register(&self, descriptor: TypeDescriptor) {
        debug!(
            type_name = %descriptor.name,
            parameters = descriptor.parameters.len(),
            instantiable = descriptor.is_instantiable(),
            "Registered type"
        );
        self.types
            .write()
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    /// Returns the descriptor for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(type_name).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.read().contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// All registered type names, sorted.
    pub fn type_names(&self) -> Vec<Alias> {
        let mut names: Vec<Alias> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn descriptor(&self, type_name: &Alias) -> Result<Arc<TypeDescriptor>> {
        self.get(type_name.as_str()).ok_or_else(|| {
            let known = self.type_names();
            PhiError::UnresolvableType(UnresolvableTypeError {
                requested: type_name.clone(),
                required_by: None,
                suggestions: suggest_similar(type_name.as_str(), &known, 3),
            })
        })
    }

    /// Walks declared supertypes depth-first.
    fn satisfies(&self, type_name: &Alias, declared: &Alias) -> bool {
        let types = self.types.read();
        let mut seen: HashSet<&Alias> = HashSet::new();
        let mut queue: Vec<&Alias> = vec![type_name];

        while let Some(current) = queue.pop() {
            if current == declared {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(descriptor) = types.get(current) {
                queue.extend(descriptor.supertypes.iter());
            }
        }

        false
    }
}

impl Introspector for TypeRegistry {
    fn signature(&self, type_name: &Alias) -> Result<Vec<ParameterDescriptor>> {
        let descriptor = self.descriptor(type_name)?;
        if !descriptor.is_instantiable() {
            return Err(PhiError::NotInstantiable {
                type_name: type_name.clone(),
            });
        }
        Ok(descriptor.parameters.clone())
    }

    fn instantiate(&self, type_name: &Alias, values: Values) -> Result<Instance> {
        let descriptor = self.descriptor(type_name)?;
        let constructor = descriptor
            .constructor
            .clone()
            .ok_or_else(|| PhiError::NotInstantiable {
                type_name: type_name.clone(),
            })?;

        trace!(type_name = %type_name, arguments = values.len(), "Instantiating");
        constructor(&values)
    }

    fn is_instance_of(&self, instance: &Instance, declared: &Alias) -> bool {
        self.satisfies(instance.type_name(), declared)
    }

    fn blueprint(&self, type_name: &Alias) -> Result<Blueprint<'_>> {
        let descriptor = self.descriptor(type_name)?;
        let Some(constructor) = descriptor.constructor.clone() else {
            return Err(PhiError::NotInstantiable {
                type_name: type_name.clone(),
            });
        };

        let type_name = type_name.clone();
        Ok(Blueprint::new(descriptor.parameters.clone(), move |values: Values| {
            trace!(type_name = %type_name, arguments = values.len(), "Instantiating");
            constructor(&values)
        }))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
