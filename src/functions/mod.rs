pub mod hyperbolic;
pub mod other;
pub mod trig;

use std::collections::HashMap;
use std::sync::Arc;

pub type Function = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// The closed set of built-in unary functions.
#[derive(Clone)]
pub struct FunctionTable {
    functions: HashMap<String, Function>,
}

impl FunctionTable {
    fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Table holding every built-in family.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        trig::register(&mut table);
        hyperbolic::register(&mut table);
        other::register(&mut table);
        table
    }

    pub(crate) fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FunctionTable")
            .field("functions", &names)
            .finish()
    }
}
