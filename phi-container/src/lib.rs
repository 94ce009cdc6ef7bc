//! Core container implementation for Phi.

pub mod alias;
pub mod binder;
pub mod binding;
pub mod container;
pub mod error;
pub mod introspect;
mod path;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod value;

pub use alias::Alias;
pub use binding::Binding;
pub use container::{prelude, Container, ContainerBuilder};
pub use error::{PhiError, Result};
pub use introspect::{Blueprint, Introspector, TypeDescriptor, TypeRegistration, TypeRegistry};
pub use value::{Arguments, Instance, Scalar, Value, Values};

#[doc(hidden)]
pub use inventory;
