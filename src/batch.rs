//! Many independent evaluations at once. Each item gets its own [`Evaluator`],
//! so nothing is shared between the worker threads.

use crate::error::EvalError;
use crate::evaluate_expression;
use crate::eval::Evaluator;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// Evaluates every expression against the same variables.
pub fn evaluate_batch<S>(
    expressions: &[S],
    variables: &HashMap<String, f64>,
) -> Vec<Result<f64, EvalError>>
where
    S: AsRef<str> + Sync,
{
    debug!("Evaluating batch of {} expressions", expressions.len());
    expressions
        .par_iter()
        .map(|expression| evaluate_expression(expression.as_ref(), variables))
        .collect()
}

/// Evaluates one expression once per context.
pub fn evaluate_contexts(
    expression: &str,
    contexts: &[HashMap<String, f64>],
) -> Vec<Result<f64, EvalError>> {
    debug!(
        "Evaluating '{}' against {} contexts",
        expression,
        contexts.len()
    );
    contexts
        .par_iter()
        .map(|context| evaluate_expression(expression, context))
        .collect()
}

/// Evaluates `expression` at each `(x, y, z)` point, reusing one evaluator per
/// rayon worker instead of building a fresh one per item.
pub fn evaluate_points(expression: &str, points: &[(f64, f64, f64)]) -> Vec<Result<f64, EvalError>> {
    points
        .par_iter()
        .map_init(Evaluator::new, |evaluator, &(x, y, z)| {
            evaluator.set_expression(expression);
            evaluator.set_variable("x", x);
            evaluator.set_variable("y", y);
            evaluator.set_variable("z", z);
            evaluator.evaluate()
        })
        .collect()
}
