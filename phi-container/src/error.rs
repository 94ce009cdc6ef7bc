//! Error types for Phi container operations.
//!
//! Errors name the alias or type involved and, where it helps, carry a
//! hint about what to do next.

use std::fmt;

use phi_support::rendering::render_chain;

use crate::alias::Alias;

/// Main error type for all Phi operations.
#[derive(Debug, thiserror::Error)]
pub enum PhiError {
    /// The introspector has never heard of the requested type.
    #[error("{}", .0)]
    UnresolvableType(UnresolvableTypeError),

    /// The type exists but cannot be constructed (abstract / interface-like).
    #[error("{type_name} is not an instantiable type\n  Hint: bind it to a concrete type, a factory or an instance")]
    NotInstantiable { type_name: Alias },

    /// An untyped constructor parameter had no argument left to take.
    #[error(
        "Missing argument for parameter `{parameter}` (position {position}) of {type_name}\n  Hint: pass it by name or add another positional argument"
    )]
    MissingArgument {
        type_name: Alias,
        parameter: String,
        position: usize,
    },

    /// A type depends on itself, directly or through other types.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// `make_as` got an instance of a different Rust type than requested.
    #[error("Type mismatch resolving {alias}: expected {expected}")]
    TypeMismatch { alias: Alias, expected: &'static str },

    /// A constructor read a value of the wrong kind from its argument vector.
    #[error("Invalid argument at position {position}: expected {expected}, found {found}")]
    InvalidArgument {
        position: usize,
        expected: String,
        found: String,
    },

    /// A constructor, factory or resolver failed with its own error.
    #[error("Failed to construct {type_name}: {source}")]
    ConstructionFailed {
        type_name: Alias,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PhiError {
    /// Wraps an arbitrary error raised while building `type_name`.
    pub fn construction(
        type_name: impl Into<Alias>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PhiError::ConstructionFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// Records which type's constructor asked for an unresolvable type.
    /// The innermost consumer wins; other errors pass through.
    pub(crate) fn required_by(mut self, parent: Option<&Alias>) -> Self {
        if let (PhiError::UnresolvableType(err), Some(parent)) = (&mut self, parent) {
            if err.required_by.is_none() {
                err.required_by = Some(parent.clone());
            }
        }
        self
    }
}

/// Error when no type is registered under the requested name.
#[derive(Debug)]
pub struct UnresolvableTypeError {
    /// The type that was requested
    pub requested: Alias,
    /// The type whose constructor needed it, if any
    pub required_by: Option<Alias>,
    /// Known aliases with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnresolvableTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unresolvable type: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register the type or bind \"{}\" before calling make()",
            self.requested
        )
    }
}

/// Error when a type is already being built further up the call stack.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// Types from the first occurrence to the repeated one.
    /// Example: ["A", "B", "A"]
    pub chain: Vec<Alias>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: pass one of these dependencies explicitly or bind it to an instance"
        )
    }
}

/// Convenient Result type for Phi operations.
pub type Result<T> = std::result::Result<T, PhiError>;
