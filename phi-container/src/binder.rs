//! Parameter binding — matches caller arguments to constructor parameters.
//!
//! Three passes, each filling only positions still empty:
//!
//! 1. **Named** — a keyed argument goes to the parameter with that name.
//!    A key that names no parameter is dropped; later passes never see it.
//! 2. **By type** — each typed parameter takes the first remaining object
//!    argument compatible with its declared type. Scalars never match.
//! 3. **Fallback** — typed parameters are auto-resolved with no arguments;
//!    untyped ones take the next remaining positional argument.
//!
//! ```text
//! parameters = [A p1, B p2, p3, B p4, p5]
//! arguments  = [b1, b2, "p5" => "asdf", "fdsa"]
//!
//! pass 1     = [  ,   ,       ,   , "asdf"]   arguments = [b1, b2, "fdsa"]
//! pass 2     = [  , b1,       , b2, "asdf"]   arguments = ["fdsa"]
//! pass 3     = [A*, b1, "fdsa", b2, "asdf"]   arguments = []
//! ```
//! (`A*` = freshly resolved.)

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::alias::Alias;
use crate::error::{PhiError, Result};
use crate::introspect::ParameterDescriptor;
use crate::value::{Arguments, Instance, Value, Values};

/// Binds arguments to the parameters of one constructor.
#[derive(Debug, Clone, Copy)]
pub struct ParameterBinder<'a> {
    type_name: &'a Alias,
    parameters: &'a [ParameterDescriptor],
}

impl<'a> ParameterBinder<'a> {
    pub fn new(type_name: &'a Alias, parameters: &'a [ParameterDescriptor]) -> Self {
        Self {
            type_name,
            parameters,
        }
    }

    /// Produces one value per parameter, consuming `arguments`.
    ///
    /// - `is_instance_of(instance, declared)` decides pass-2 compatibility.
    /// - `resolve(declared)` builds a typed dependency in pass 3.
    ///
    /// # Errors
    /// - [`PhiError::MissingArgument`] — an untyped parameter found no
    ///   positional argument left
    /// - anything `resolve` returns
    pub fn bind<C, R>(&self, arguments: Arguments, is_instance_of: C, mut resolve: R) -> Result<Values>
    where
        C: Fn(&Instance, &Alias) -> bool,
        R: FnMut(&Alias) -> Result<Instance>,
    {
        self.check_positions()?;

        let mut slots: Vec<Option<Value>> = vec![None; self.parameters.len()];

        let remaining = self.bind_named(arguments, &mut slots);
        let remaining = self.bind_by_type(remaining, &mut slots, &is_instance_of);
        self.bind_fallback(remaining, &mut slots, &mut resolve)?;

        Ok(Values::new(slots.into_iter().flatten().collect()))
    }

    // ── Pass 1 ──

    fn bind_named(&self, arguments: Arguments, slots: &mut [Option<Value>]) -> Vec<Value> {
        let mut remaining = Vec::with_capacity(arguments.len());

        for argument in arguments {
            let Some(key) = argument.key else {
                remaining.push(argument.value);
                continue;
            };

            match self.parameters.iter().find(|p| p.name == key) {
                Some(parameter) => {
                    trace!(type_name = %self.type_name, parameter = %key, "Bound by name");
                    slots[parameter.position] = Some(argument.value);
                }
                None => {
                    warn!(
                        type_name = %self.type_name,
                        key = %key,
                        "Named argument matches no parameter and is ignored"
                    );
                }
            }
        }

        remaining
    }

    // ── Pass 2 ──

    fn bind_by_type<C>(&self, mut remaining: Vec<Value>, slots: &mut [Option<Value>], is_instance_of: &C) -> Vec<Value>
    where
        C: Fn(&Instance, &Alias) -> bool,
    {
        for parameter in self.parameters {
            if slots[parameter.position].is_some() {
                continue;
            }
            let Some(declared) = &parameter.declared_type else {
                continue;
            };

            let found = remaining.iter().position(|value| {
                value
                    .as_instance()
                    .is_some_and(|instance| is_instance_of(instance, declared))
            });

            if let Some(index) = found {
                trace!(
                    type_name = %self.type_name,
                    parameter = %parameter.name,
                    declared = %declared,
                    "Bound by type"
                );
                slots[parameter.position] = Some(remaining.remove(index));
            }
        }

        remaining
    }

    // ── Pass 3 ──

    fn bind_fallback<R>(&self, remaining: Vec<Value>, slots: &mut [Option<Value>], resolve: &mut R) -> Result<()>
    where
        R: FnMut(&Alias) -> Result<Instance>,
    {
        let mut positional: VecDeque<Value> = remaining.into();

        for parameter in self.parameters {
            if slots[parameter.position].is_some() {
                continue;
            }

            let value = match &parameter.declared_type {
                Some(declared) => {
                    trace!(
                        type_name = %self.type_name,
                        parameter = %parameter.name,
                        declared = %declared,
                        "Auto-injecting"
                    );
                    Value::Object(resolve(declared)?)
                }
                None => positional
                    .pop_front()
                    .ok_or_else(|| PhiError::MissingArgument {
                        type_name: self.type_name.clone(),
                        parameter: parameter.name.clone(),
                        position: parameter.position,
                    })?,
            };

            slots[parameter.position] = Some(value);
        }

        if !positional.is_empty() {
            trace!(type_name = %self.type_name, unused = positional.len(), "Extra arguments ignored");
        }

        Ok(())
    }

    fn check_positions(&self) -> Result<()> {
        for (index, parameter) in self.parameters.iter().enumerate() {
            if parameter.position != index {
                return Err(PhiError::construction(
                    self.type_name,
                    format!(
                        "parameter `{}` listed at index {index} declares position {}",
                        parameter.name, parameter.position
                    ),
                ));
            }
        }
        Ok(())
    }
}
