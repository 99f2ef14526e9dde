use infix_calc::{Evaluator, MapResolver};
use std::time::Duration;

/// Runs evaluations on a blocking worker so a slow resolver can be abandoned
/// by the caller.
#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let expressions = [
        "x - y * 2 + y * (x * y)",
        "cube(x) / 5",
        "-(2*3*2-5) * -3",
        "sqrt(1.2.3)",
    ];

    for expression in expressions {
        let resolver = MapResolver::new()
            .with_variable("x", 5.0)
            .with_variable("y", 2.0)
            .with_function("cube", "t", "t * t * t");

        let handle = tokio::task::spawn_blocking(move || {
            let mut evaluator = Evaluator::with_resolver(resolver);
            evaluator.set_expression(expression);
            evaluator.evaluate()
        });

        match tokio::time::timeout(Duration::from_secs(2), handle).await {
            Ok(Ok(Ok(value))) => println!("{} = {}", expression, value),
            Ok(Ok(Err(err))) => println!("{}: error: {}", expression, err),
            Ok(Err(join_error)) => println!("{}: worker failed: {}", expression, join_error),
            Err(_) => println!("{}: timed out", expression),
        }
    }
}
