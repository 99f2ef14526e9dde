use crate::error::{EvalError, Result};
use crate::eval::Resolver;
use crate::lexer::KnownNames;
use log::debug;
use std::collections::HashMap;
use std::f64::consts;

/// Pre-bound names. They can be re-bound but never become unbound.
pub const CONSTANTS: [(&str, f64); 2] = [("pi", consts::PI), ("e", consts::E)];

/// Names reset to unbound whenever a new expression is set.
pub const CONVENTIONAL_VARIABLES: [&str; 3] = ["x", "y", "z"];

/// Identifier to optional scalar mapping. A name present in the map is "known";
/// a known name mapped to `None` is declared but unbound.
#[derive(Debug, Clone)]
pub struct Environment {
    values: HashMap<String, Option<f64>>,
}

impl Environment {
    pub fn new() -> Self {
        let values = CONSTANTS
            .iter()
            .map(|(name, value)| (name.to_string(), Some(*value)))
            .collect();
        Self { values }
    }

    pub fn is_constant(name: &str) -> bool {
        CONSTANTS.iter().any(|(constant, _)| *constant == name)
    }

    pub fn is_valid_identifier(name: &str) -> bool {
        !name.is_empty() && name.chars().all(char::is_alphabetic)
    }

    /// Marks `name` as known but unbound, dropping any value it had.
    /// Constants are left untouched.
    pub fn declare(&mut self, name: &str) -> Result<()> {
        if !Self::is_valid_identifier(name) {
            return Err(EvalError::InvalidIdentifier(name.to_string()));
        }
        if !Self::is_constant(name) {
            self.values.insert(name.to_string(), None);
        }
        Ok(())
    }

    /// Declares the conventional `x`, `y`, `z` afresh.
    pub fn reset_conventional(&mut self) {
        for name in CONVENTIONAL_VARIABLES {
            self.values.insert(name.to_string(), None);
        }
    }

    /// Sets the value of a known name. Unknown names are ignored; the return
    /// value tells whether anything was bound.
    pub fn bind(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// Value of `name`, asking `resolver` once if the name is declared but
    /// unbound. The answer stays bound afterwards.
    pub fn resolve<R: Resolver + ?Sized>(&mut self, name: &str, resolver: &mut R) -> Result<f64> {
        match self.values.get(name).copied() {
            None => Err(EvalError::UnknownIdentifier(name.to_string())),
            Some(Some(value)) => Ok(value),
            Some(None) => {
                debug!("Resolving unbound variable '{}'", name);
                let value = resolver
                    .resolve_variable(name)
                    .map_err(|reason| EvalError::Resolver {
                        name: name.to_string(),
                        reason,
                    })?;
                self.values.insert(name.to_string(), Some(value));
                Ok(value)
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl KnownNames for Environment {
    fn is_known(&self, name: &str) -> bool {
        Environment::is_known(self, name)
    }

    fn longest_name(&self) -> usize {
        self.names()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
    }
}
