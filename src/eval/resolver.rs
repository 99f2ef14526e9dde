use std::collections::HashMap;

/// Body of an ad hoc one-argument function: the expression text and the name
/// standing for the call argument inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub placeholder: String,
    pub body: String,
}

impl UserFunction {
    pub fn new(placeholder: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            body: body.into(),
        }
    }
}

/// Supplies values the evaluator cannot find on its own.
///
/// Both methods are called synchronously from inside an evaluation and block it
/// until they return. Implementations typically prompt a user, but scripted
/// answers work just as well.
pub trait Resolver {
    /// Value for a variable that is declared but currently unbound.
    fn resolve_variable(&mut self, name: &str) -> Result<f64, String>;

    /// Body for a function name outside the built-in table. Queried on every
    /// application, never cached.
    fn resolve_function(&mut self, name: &str) -> Result<UserFunction, String>;
}

impl<R: Resolver + ?Sized> Resolver for &mut R {
    fn resolve_variable(&mut self, name: &str) -> Result<f64, String> {
        (**self).resolve_variable(name)
    }

    fn resolve_function(&mut self, name: &str) -> Result<UserFunction, String> {
        (**self).resolve_function(name)
    }
}

/// Resolver for evaluators that must never block: every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn resolve_variable(&mut self, _name: &str) -> Result<f64, String> {
        Err("variable is unbound and no resolver is configured".to_string())
    }

    fn resolve_function(&mut self, _name: &str) -> Result<UserFunction, String> {
        Err("function is not built in and no resolver is configured".to_string())
    }
}

/// Answers from fixed tables.
#[derive(Debug, Default, Clone)]
pub struct MapResolver {
    variables: HashMap<String, f64>,
    functions: HashMap<String, UserFunction>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: &str, value: f64) -> Self {
        self.variables.insert(name.to_string(), value);
        self
    }

    pub fn with_function(mut self, name: &str, placeholder: &str, body: &str) -> Self {
        self.functions
            .insert(name.to_string(), UserFunction::new(placeholder, body));
        self
    }
}

impl From<HashMap<String, f64>> for MapResolver {
    fn from(variables: HashMap<String, f64>) -> Self {
        Self {
            variables,
            functions: HashMap::new(),
        }
    }
}

impl Resolver for MapResolver {
    fn resolve_variable(&mut self, name: &str) -> Result<f64, String> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| format!("no value scripted for variable '{}'", name))
    }

    fn resolve_function(&mut self, name: &str) -> Result<UserFunction, String> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| format!("no body scripted for function '{}'", name))
    }
}
