//! Values flowing through resolution.
//!
//! - [`Instance`]: a shared, type-erased object tagged with its type alias
//! - [`Scalar`]: a plain (non-object) argument
//! - [`Arguments`]: what a caller hands to `make`
//! - [`Values`]: what a constructor receives, one value per parameter

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alias::Alias;
use crate::error::{PhiError, Result};

// ═══════════════════════════════════════════
// Instance
// ═══════════════════════════════════════════

/// A constructed object.
///
/// Cloning an `Instance` shares the same object; use [`Instance::ptr_eq`]
/// to compare identities.
#[derive(Clone)]
pub struct Instance {
    type_name: Alias,
    object: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wraps `value` as an instance of the type named `type_name`.
    pub fn new<T: Send + Sync + 'static>(type_name: impl Into<Alias>, value: T) -> Self {
        Self::from_arc(type_name, Arc::new(value))
    }

    /// Wraps an already shared value.
    pub fn from_arc<T: Send + Sync + 'static>(type_name: impl Into<Alias>, value: Arc<T>) -> Self {
        Self {
            type_name: type_name.into(),
            object: value,
        }
    }

    /// Wraps `value` using [`Alias::of`] as the type name.
    pub fn of<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Alias::of::<T>(), value)
    }

    /// The name of the concrete type this instance was built as.
    #[inline]
    pub fn type_name(&self) -> &Alias {
        &self.type_name
    }

    /// Returns the object as `Arc<T>` if it is a `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.object.clone().downcast::<T>().ok()
    }

    /// Returns `true` if the object is a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.object.is::<T>()
    }

    /// Returns `true` if both handles point at the same object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({} @ {:p})", self.type_name, Arc::as_ptr(&self.object))
    }
}

// ═══════════════════════════════════════════
// Scalar / Value
// ═══════════════════════════════════════════

/// A non-object argument value.
///
/// Scalars never satisfy a declared parameter type; they only fill
/// untyped parameters, by name or by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Any value that can be passed to `make` or to a constructor.
#[derive(Debug, Clone)]
pub enum Value {
    Object(Instance),
    Scalar(Scalar),
}

impl Value {
    /// Returns the instance if this value is an object.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            Value::Scalar(_) => None,
        }
    }

    /// Returns the scalar if this value is not an object.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Object(_) => None,
            Value::Scalar(scalar) => Some(scalar),
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Object(instance) => instance.type_name().to_string(),
            Value::Scalar(scalar) => scalar.kind().to_string(),
        }
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl From<&Instance> for Value {
    fn from(instance: &Instance) -> Self {
        Value::Object(instance.clone())
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Scalar(Scalar::Null)
    }
}

// ═══════════════════════════════════════════
// Arguments
// ═══════════════════════════════════════════

/// One caller-supplied argument, optionally keyed by parameter name.
#[derive(Debug, Clone)]
pub struct Argument {
    pub key: Option<String>,
    pub value: Value,
}

/// The ordered argument list passed to `make`.
///
/// Keys are unique: adding a keyed argument whose key is already present
/// replaces the earlier value in place.
///
/// ```
/// use phi_container::value::Arguments;
///
/// let args = Arguments::new().with("y").with_named("val2", "x");
/// assert_eq!(args.len(), 2);
/// assert!(args.get("val2").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    items: Vec<Argument>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Appends (or replaces) a named argument.
    pub fn with_named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_named(key, value);
        self
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(Argument {
            key: None,
            value: value.into(),
        });
    }

    pub fn push_named(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.items.iter_mut().find(|a| a.key.as_deref() == Some(key.as_str())) {
            Some(existing) => existing.value = value,
            None => self.items.push(Argument {
                key: Some(key),
                value,
            }),
        }
    }

    /// Looks up a named argument.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|a| a.key.as_deref() == Some(key))
            .map(|a| &a.value)
    }

    /// Positional access, counting every argument (keyed or not).
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.items.get(index).map(|a| &a.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for Arguments {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for value in iter {
            args.push(value);
        }
        args
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ═══════════════════════════════════════════
// Values
// ═══════════════════════════════════════════

/// The resolved argument vector handed to a constructor.
///
/// One value per constructor parameter, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Values {
    items: Vec<Value>,
}

impl Values {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.items.get(position)
    }

    /// The object at `position`.
    pub fn instance(&self, position: usize) -> Result<Instance> {
        match self.value(position)? {
            Value::Object(instance) => Ok(instance.clone()),
            other => Err(self.mismatch(position, "object", other)),
        }
    }

    /// The object at `position`, downcast to `T`.
    pub fn object<T: Send + Sync + 'static>(&self, position: usize) -> Result<Arc<T>> {
        let value = self.value(position)?;
        value
            .as_instance()
            .and_then(Instance::downcast::<T>)
            .ok_or_else(|| self.mismatch(position, type_name::<T>(), value))
    }

    /// The scalar at `position`.
    pub fn scalar(&self, position: usize) -> Result<&Scalar> {
        let value = self.value(position)?;
        value
            .as_scalar()
            .ok_or_else(|| self.mismatch(position, "scalar", value))
    }

    pub fn str(&self, position: usize) -> Result<&str> {
        match self.scalar(position)? {
            Scalar::Str(s) => Ok(s),
            _ => Err(self.mismatch(position, "string", &self.items[position])),
        }
    }

    pub fn int(&self, position: usize) -> Result<i64> {
        match self.scalar(position)? {
            Scalar::Int(i) => Ok(*i),
            _ => Err(self.mismatch(position, "int", &self.items[position])),
        }
    }

    /// Accepts integers too.
    pub fn float(&self, position: usize) -> Result<f64> {
        match self.scalar(position)? {
            Scalar::Float(x) => Ok(*x),
            Scalar::Int(i) => Ok(*i as f64),
            _ => Err(self.mismatch(position, "float", &self.items[position])),
        }
    }

    pub fn bool(&self, position: usize) -> Result<bool> {
        match self.scalar(position)? {
            Scalar::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(position, "bool", &self.items[position])),
        }
    }

    fn value(&self, position: usize) -> Result<&Value> {
        self.items.get(position).ok_or(PhiError::InvalidArgument {
            position,
            expected: "a value".to_string(),
            found: format!("only {} value(s)", self.items.len()),
        })
    }

    fn mismatch(&self, position: usize, expected: &str, found: &Value) -> PhiError {
        PhiError::InvalidArgument {
            position,
            expected: expected.to_string(),
            found: found.describe(),
        }
    }
}

impl IntoIterator for Values {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
