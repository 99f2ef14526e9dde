use crate::error::{EvalError, Result};
use crate::eval::{Environment, Resolver};
use crate::functions::FunctionTable;
use crate::lexer::{tokenize, Token, TokenCursor, TokenKind, TokenSequence, WithPlaceholder};
use log::{debug, trace};

/// Deepest factor nesting accepted before an evaluation is aborted.
pub const MAX_DEPTH: usize = 128;

/// One evaluation pass. Borrows the instance state for the duration of a single
/// `evaluate` call.
pub(crate) struct Grammar<'a, R: Resolver + ?Sized> {
    environment: &'a mut Environment,
    functions: &'a FunctionTable,
    resolver: &'a mut R,
    depth: usize,
}

impl<'a, R: Resolver + ?Sized> Grammar<'a, R> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        functions: &'a FunctionTable,
        resolver: &'a mut R,
    ) -> Self {
        Self {
            environment,
            functions,
            resolver,
            depth: 0,
        }
    }

    pub(crate) fn evaluate_text(&mut self, text: &str) -> Result<f64> {
        let tokens = tokenize(text, &*self.environment)?;
        self.evaluate_tokens(&tokens)
    }

    pub(crate) fn evaluate_tokens(&mut self, tokens: &TokenSequence) -> Result<f64> {
        self.bind_variables(tokens)?;
        let mut cursor = tokens.cursor();
        self.expr(&mut cursor)
    }

    /// Resolves unbound variables in source order before any arithmetic runs.
    fn bind_variables(&mut self, tokens: &TokenSequence) -> Result<()> {
        for token in tokens.iter().filter(|t| t.kind() == TokenKind::Variable) {
            self.environment.resolve(token.text(), &mut *self.resolver)?;
        }
        Ok(())
    }

    fn expr(&mut self, cursor: &mut TokenCursor) -> Result<f64> {
        let first = next(cursor)?;
        if first.kind() == TokenKind::EndOfInput {
            return Ok(0.0);
        }
        cursor.back();

        let value = self.add_sub(cursor)?;
        let last = next(cursor)?;
        match last.kind() {
            TokenKind::EndOfInput => Ok(value),
            _ => Err(unexpected(last)),
        }
    }

    fn add_sub(&mut self, cursor: &mut TokenCursor) -> Result<f64> {
        trace!("add_sub at {}", cursor.position());
        let mut value = self.mul_div(cursor)?;
        loop {
            let token = next(cursor)?;
            match token.kind() {
                TokenKind::Plus => value += self.mul_div(cursor)?,
                TokenKind::Minus => value -= self.mul_div(cursor)?,
                TokenKind::EndOfInput | TokenKind::RightParen => {
                    cursor.back();
                    return Ok(value);
                }
                _ => return Err(unexpected(token)),
            }
        }
    }

    fn mul_div(&mut self, cursor: &mut TokenCursor) -> Result<f64> {
        trace!("mul_div at {}", cursor.position());
        let mut value = self.factor(cursor)?;
        loop {
            let token = next(cursor)?;
            match token.kind() {
                TokenKind::Star => value *= self.factor(cursor)?,
                TokenKind::Slash => value /= self.factor(cursor)?,
                TokenKind::EndOfInput
                | TokenKind::RightParen
                | TokenKind::Plus
                | TokenKind::Minus => {
                    cursor.back();
                    return Ok(value);
                }
                _ => return Err(unexpected(token)),
            }
        }
    }

    fn factor(&mut self, cursor: &mut TokenCursor) -> Result<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::RecursionLimit { depth: MAX_DEPTH });
        }
        self.depth += 1;
        let result = self.parse_factor(cursor);
        self.depth -= 1;
        result
    }

    fn parse_factor(&mut self, cursor: &mut TokenCursor) -> Result<f64> {
        let token = next(cursor)?;
        trace!("factor {}", token);
        match token.kind() {
            TokenKind::Number => token.text().parse::<f64>().map_err(|_| unexpected(token)),
            TokenKind::Variable => self.environment.resolve(token.text(), &mut *self.resolver),
            TokenKind::LeftParen => {
                let value = self.add_sub(cursor)?;
                let closing = next(cursor)?;
                if closing.kind() != TokenKind::RightParen {
                    return Err(unexpected(closing));
                }
                Ok(value)
            }
            TokenKind::Function => {
                let argument = self.factor(cursor)?;
                self.apply_function(token.text(), argument)
            }
            TokenKind::Minus => Ok(-self.factor(cursor)?),
            _ => Err(unexpected(token)),
        }
    }

    fn apply_function(&mut self, name: &str, argument: f64) -> Result<f64> {
        match self.functions.get(name) {
            Some(function) => Ok(function(argument)),
            None => self.call_user_function(name, argument),
        }
    }

    /// Fetches the body of a function outside the built-in table, substitutes
    /// the argument for its placeholder and evaluates it as a fresh expression.
    fn call_user_function(&mut self, name: &str, argument: f64) -> Result<f64> {
        debug!("Resolving user function '{}'", name);
        let function = self
            .resolver
            .resolve_function(name)
            .map_err(|reason| EvalError::Resolver {
                name: name.to_string(),
                reason,
            })?;
        if !Environment::is_valid_identifier(&function.placeholder) {
            return Err(EvalError::InvalidIdentifier(function.placeholder));
        }

        let scope = WithPlaceholder {
            names: &*self.environment,
            placeholder: &function.placeholder,
        };
        let tokens = tokenize(&function.body, &scope)?.substitute(&function.placeholder, argument);
        debug!(
            "Evaluating {}({}) with body '{}'",
            name, argument, function.body
        );
        self.evaluate_tokens(&tokens)
    }
}

fn next<'t>(cursor: &mut TokenCursor<'t>) -> Result<&'t Token> {
    let position = cursor.position();
    cursor.next().ok_or_else(|| EvalError::Syntax {
        found: "end of input".to_string(),
        position,
    })
}

fn unexpected(token: &Token) -> EvalError {
    EvalError::Syntax {
        found: token.describe(),
        position: token.position(),
    }
}
