use crate::lexer::Token;

/// A movable position over a token slice, giving the grammar one token of
/// lookahead with explicit backtracking.
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Returns the token at the current position and moves past it.
    pub fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Steps back one token and returns the token now under the cursor.
    pub fn back(&mut self) -> Option<&'a Token> {
        self.position = self.position.checked_sub(1)?;
        self.tokens.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }
}
