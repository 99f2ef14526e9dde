pub mod batch;
pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;

pub use error::{EvalError, LexError};
pub use eval::{Environment, Evaluator, MapResolver, NoResolver, Resolver, UserFunction};
pub use lexer::{Token, TokenKind, TokenSequence};

use std::collections::HashMap;

/// Evaluates `expression` once with a fresh evaluator, declaring and binding
/// every entry of `variables` first.
pub fn evaluate_expression(
    expression: &str,
    variables: &HashMap<String, f64>,
) -> Result<f64, EvalError> {
    let mut evaluator = Evaluator::new();
    evaluator.set_expression(expression);
    for (name, value) in variables {
        evaluator.declare_variable(name)?;
        evaluator.set_variable(name, *value);
    }
    evaluator.evaluate()
}
