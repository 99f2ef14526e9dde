use infix_calc::{Evaluator, Resolver, UserFunction};
use log::debug;
use std::io::{self, BufRead, Write};

/// Asks the user on stdin for anything the evaluator cannot resolve itself.
struct ConsoleResolver;

impl ConsoleResolver {
    fn prompt(&self, message: &str) -> Result<String, String> {
        print!("{}", message);
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        if read == 0 {
            return Err("input closed".to_string());
        }
        Ok(line.trim().to_string())
    }
}

impl Resolver for ConsoleResolver {
    fn resolve_variable(&mut self, name: &str) -> Result<f64, String> {
        let answer = self.prompt(&format!("Enter the value of your variable {}: ", name))?;
        answer
            .parse::<f64>()
            .map_err(|e| format!("'{}' is not a number: {}", answer, e))
    }

    fn resolve_function(&mut self, name: &str) -> Result<UserFunction, String> {
        let placeholder = self.prompt(&format!("Argument name of function {}: ", name))?;
        let body = self.prompt(&format!("Body of {}({}): ", name, placeholder))?;
        Ok(UserFunction::new(placeholder, body))
    }
}

fn main() {
    pretty_env_logger::init();

    let mut evaluator = Evaluator::with_resolver(ConsoleResolver);
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let expression = line.trim();
        if expression == "quit" || expression == "exit" {
            break;
        }

        debug!("Read expression: {}", expression);
        evaluator.set_expression(expression);
        match evaluator.evaluate() {
            Ok(result) => println!("{}", result),
            Err(err) => println!("Error: {}", err),
        }
    }
}
