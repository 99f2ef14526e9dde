mod environment;
mod grammar;
mod resolver;

pub use environment::{Environment, CONSTANTS, CONVENTIONAL_VARIABLES};
pub use grammar::MAX_DEPTH;
pub use resolver::{MapResolver, NoResolver, Resolver, UserFunction};

use crate::error::Result;
use crate::functions::FunctionTable;
use crate::lexer::{tokenize, TokenSequence};
use grammar::Grammar;
use log::debug;

/// An expression together with the variables it is evaluated against.
///
/// The environment outlives individual evaluations: setting a new expression
/// resets `x`, `y` and `z`, every other binding is kept.
pub struct Evaluator<R = NoResolver> {
    expression: String,
    environment: Environment,
    functions: FunctionTable,
    resolver: R,
}

impl Evaluator<NoResolver> {
    /// Creates an evaluator that fails instead of asking for missing values.
    pub fn new() -> Self {
        Self::with_resolver(NoResolver)
    }
}

impl Default for Evaluator<NoResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resolver> Evaluator<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            expression: String::new(),
            environment: Environment::new(),
            functions: FunctionTable::builtin(),
            resolver,
        }
    }

    /// Stores `text` and declares `x`, `y`, `z` as unbound.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.expression = text.into();
        debug!("Expression set: {}", self.expression);
        self.environment.reset_conventional();
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Binds `name` if it is already known; otherwise does nothing.
    pub fn set_variable(&mut self, name: &str, value: f64) -> bool {
        self.environment.bind(name, value)
    }

    /// Introduces `name` as a known, unbound variable.
    pub fn declare_variable(&mut self, name: &str) -> Result<()> {
        self.environment.declare(name)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.environment.value(name)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn into_resolver(self) -> R {
        self.resolver
    }

    /// Lexes `text` against the current environment without evaluating it.
    pub fn tokenize(&self, text: &str) -> Result<TokenSequence> {
        Ok(tokenize(text, &self.environment)?)
    }

    /// Evaluates the stored expression. May block on the resolver.
    pub fn evaluate(&mut self) -> Result<f64> {
        let mut grammar = Grammar::new(&mut self.environment, &self.functions, &mut self.resolver);
        let value = grammar.evaluate_text(&self.expression)?;
        debug!("Evaluated '{}' = {}", self.expression, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, LexError};
    use crate::lexer::TokenKind;
    use rand::Rng;

    /// Scripted resolver that records what it was asked.
    #[derive(Default)]
    struct Recording {
        values: Vec<f64>,
        bodies: Vec<UserFunction>,
        variable_requests: Vec<String>,
        function_requests: Vec<String>,
    }

    impl Resolver for Recording {
        fn resolve_variable(&mut self, name: &str) -> std::result::Result<f64, String> {
            self.variable_requests.push(name.to_string());
            if self.values.is_empty() {
                return Err("out of values".to_string());
            }
            Ok(self.values.remove(0))
        }

        fn resolve_function(&mut self, name: &str) -> std::result::Result<UserFunction, String> {
            self.function_requests.push(name.to_string());
            if self.bodies.is_empty() {
                return Err("out of bodies".to_string());
            }
            Ok(self.bodies.remove(0))
        }
    }

    fn evaluate(text: &str) -> Result<f64> {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression(text);
        evaluator.evaluate()
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
    }

    #[test]
    fn test_simple_expression() {
        assert_eq!(evaluate("-(2*3*2-5) * -3"), Ok(21.0));
    }

    #[test]
    fn test_builtin_function() {
        assert_eq!(evaluate("abs(3*-3)"), Ok(9.0));
    }

    #[test]
    fn test_decimal_arithmetic() {
        assert_eq!(evaluate("0.5 * 4 + 1.25"), Ok(3.25));
    }

    #[test]
    fn test_evaluate_x() {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression("-x-1-3*(-1 - (5 * 1 - 4)) * -x");
        evaluator.set_variable("x", 1.0);
        assert_eq!(evaluator.evaluate(), Ok(-8.0));
    }

    #[test]
    fn test_evaluate_xy() {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression("x - y * 2 + y * ( x * y)");
        evaluator.set_variable("x", 5.0);
        evaluator.set_variable("y", 2.0);
        assert_eq!(evaluator.evaluate(), Ok(21.0));
    }

    #[test]
    fn test_function_expression_with_constant() {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression("cos(-x * (sin(pi/2) - 1)) * sqrt(abs(-5)*5 + 25 - x)");
        evaluator.set_variable("x", 1.0);
        assert_eq!(evaluator.evaluate(), Ok(7.0));
    }

    #[test]
    fn test_random_bindings_match_native_arithmetic() {
        let mut rng = rand::rng();
        let mut evaluator = Evaluator::new();
        for _ in 0..100 {
            let x: f64 = rng.random_range(-100.0..100.0);
            let y: f64 = rng.random_range(-100.0..100.0);
            evaluator.set_expression("x-y*2+y*(x*y)");
            evaluator.set_variable("x", x);
            evaluator.set_variable("y", y);
            assert_eq!(evaluator.evaluate(), Ok(x - y * 2.0 + y * (x * y)));
        }
    }

    #[test]
    fn test_deterministic_repeated_evaluation() {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression("sin(x)*e/lg(100)");
        evaluator.set_variable("x", 0.3);
        let first = evaluator.evaluate().unwrap();
        let second = evaluator.evaluate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tokenize_round_trip() {
        use TokenKind::*;
        let evaluator = Evaluator::new();
        let tokens = evaluator.tokenize("-1*3/(12+3)*e").unwrap();
        assert_eq!(
            tokens.kinds(),
            vec![
                Minus, Number, Star, Number, Slash, LeftParen, Number, Plus, Number, RightParen,
                Star, Variable, EndOfInput
            ]
        );
    }

    #[test]
    fn test_malformed_literal() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.tokenize("2 * 1.2.3"),
            Err(EvalError::Lex(LexError::MalformedNumber { .. }))
        ));
        assert!(matches!(
            evaluate("1.2.3 + 1"),
            Err(EvalError::Lex(LexError::MalformedNumber { .. }))
        ));
    }

    #[test]
    fn test_unknown_identifier_does_not_ask() {
        let mut evaluator = Evaluator::with_resolver(Recording::default());
        evaluator.set_expression("w + 1");
        assert!(matches!(
            evaluator.evaluate(),
            Err(EvalError::Lex(LexError::UnrecognizedIdentifier { .. }))
        ));

        let mut environment = evaluator.environment().clone();
        assert_eq!(
            environment.resolve("w", evaluator.resolver_mut()),
            Err(EvalError::UnknownIdentifier("w".to_string()))
        );
        assert!(evaluator.resolver().variable_requests.is_empty());
    }

    #[test]
    fn test_unbound_variable_is_resolved_once() {
        let resolver = Recording {
            values: vec![4.0],
            ..Default::default()
        };
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("x * x + x");

        assert_eq!(evaluator.evaluate(), Ok(20.0));
        assert_eq!(evaluator.evaluate(), Ok(20.0));
        assert_eq!(evaluator.resolver().variable_requests, vec!["x"]);
        assert_eq!(evaluator.variable("x"), Some(4.0));
    }

    #[test]
    fn test_variables_resolved_in_source_order_before_evaluation() {
        let resolver = Recording {
            values: vec![1.0, 2.0],
            ..Default::default()
        };
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("z + y +");

        assert!(matches!(evaluator.evaluate(), Err(EvalError::Syntax { .. })));
        assert_eq!(evaluator.resolver().variable_requests, vec!["z", "y"]);
    }

    #[test]
    fn test_missing_value_without_resolver() {
        let mut evaluator = Evaluator::new();
        evaluator.set_expression("x + 1");
        assert!(matches!(
            evaluator.evaluate(),
            Err(EvalError::Resolver { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn test_new_expression_resets_conventional_variables_only() {
        let resolver = Recording {
            values: vec![10.0, 3.0],
            ..Default::default()
        };
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.declare_variable("rate").unwrap();

        evaluator.set_expression("x * rate");
        assert_eq!(evaluator.evaluate(), Ok(30.0));

        evaluator.set_expression("x + rate");
        assert_eq!(evaluator.variable("x"), None);
        assert_eq!(evaluator.variable("rate"), Some(3.0));
        evaluator.set_variable("x", 7.0);
        assert_eq!(evaluator.evaluate(), Ok(10.0));
        assert_eq!(evaluator.resolver().variable_requests, vec!["x", "rate"]);
    }

    #[test]
    fn test_set_variable_ignores_unknown_names() {
        let mut evaluator = Evaluator::new();
        assert!(!evaluator.set_variable("x", 1.0));
        evaluator.set_expression("1");
        assert!(evaluator.set_variable("x", 1.0));
        assert!(!evaluator.set_variable("w", 1.0));
        assert_eq!(evaluator.variable("w"), None);
    }

    #[test]
    fn test_constants_can_be_rebound() {
        let mut evaluator = Evaluator::new();
        assert!(evaluator.set_variable("pi", 3.0));
        evaluator.set_expression("pi * 2");
        assert_eq!(evaluator.evaluate(), Ok(6.0));
    }

    #[test]
    fn test_user_function_requeried_each_application() {
        let resolver = Recording {
            bodies: vec![UserFunction::new("t", "t + 1"), UserFunction::new("t", "t * 10")],
            ..Default::default()
        };
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("f(2) + f(3)");

        assert_eq!(evaluator.evaluate(), Ok(33.0));
        assert_eq!(evaluator.resolver().function_requests, vec!["f", "f"]);
    }

    #[test]
    fn test_user_function_placeholder_shadows_variable() {
        let resolver = MapResolver::new().with_function("g", "x", "x * y");
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("g(-2)");
        evaluator.set_variable("x", 100.0);
        evaluator.set_variable("y", 4.0);
        assert_eq!(evaluator.evaluate(), Ok(-8.0));
    }

    #[test]
    fn test_user_function_body_resolves_unbound_variables() {
        let resolver = MapResolver::new()
            .with_function("shift", "t", "t + z")
            .with_variable("z", 0.5);
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("shift(1) * 2");
        assert_eq!(evaluator.evaluate(), Ok(3.0));
        assert_eq!(evaluator.variable("z"), Some(0.5));
    }

    #[test]
    fn test_evaluate_before_expression_is_zero() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.expression(), "");
        assert_eq!(evaluator.evaluate(), Ok(0.0));
    }

    #[test]
    fn test_builtin_functions_exposed() {
        let evaluator = Evaluator::new();
        assert!(evaluator.functions().contains("cosec"));
        assert!(!evaluator.functions().contains("f"));
    }

    #[test]
    fn test_into_resolver_returns_recorded_requests() {
        let resolver = Recording {
            values: vec![2.0],
            ..Default::default()
        };
        let mut evaluator = Evaluator::with_resolver(resolver);
        evaluator.set_expression("y * 3");
        assert_eq!(evaluator.evaluate(), Ok(6.0));

        let resolver = evaluator.into_resolver();
        assert_eq!(resolver.variable_requests, vec!["y".to_string()]);
        assert!(resolver.values.is_empty());
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert_eq!(evaluate("1 / (2 - 2)"), Ok(f64::INFINITY));
    }
}
