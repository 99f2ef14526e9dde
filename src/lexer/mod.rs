mod cursor;

pub use cursor::TokenCursor;

use crate::error::LexError;
use log::{debug, trace};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Function,
    Number,
    Variable,
    EndOfInput,
}

impl TokenKind {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            _ => None,
        }
    }
}

/// A lexical unit: its kind, the literal text it was read from (number literal,
/// function or variable name, operator symbol) and its character offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// How the token is named in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}('{}')", self.kind, self.text)
    }
}

/// Ordered tokens terminated by exactly one `EndOfInput`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    /// Wraps `tokens`, appending the terminator if the caller left it out.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        tokens.retain(|token| token.kind != TokenKind::EndOfInput);
        let end = tokens
            .last()
            .map(|token| token.position + token.text.chars().count())
            .unwrap_or(0);
        tokens.push(Token::new(TokenKind::EndOfInput, "", end));
        Self { tokens }
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(Token::kind).collect()
    }

    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::new(&self.tokens)
    }

    /// Returns a new sequence in which every `Variable` token named `placeholder`
    /// is replaced by a `Number` token carrying `value`.
    pub fn substitute(&self, placeholder: &str, value: f64) -> TokenSequence {
        let tokens = self
            .tokens
            .iter()
            .map(|token| {
                if token.kind == TokenKind::Variable && token.text == placeholder {
                    Token::new(TokenKind::Number, value.to_string(), token.position)
                } else {
                    token.clone()
                }
            })
            .collect();
        TokenSequence { tokens }
    }
}

impl Deref for TokenSequence {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

/// The set of names the lexer may classify as variables.
pub trait KnownNames {
    fn is_known(&self, name: &str) -> bool;

    /// Character count of the longest known name; no longer prefix of an
    /// identifier run is ever tried.
    fn longest_name(&self) -> usize;
}

/// Known names extended by one extra name, used when lexing a user-function body
/// whose placeholder is not part of the environment.
pub struct WithPlaceholder<'a, K: KnownNames + ?Sized> {
    pub names: &'a K,
    pub placeholder: &'a str,
}

impl<K: KnownNames + ?Sized> KnownNames for WithPlaceholder<'_, K> {
    fn is_known(&self, name: &str) -> bool {
        name == self.placeholder || self.names.is_known(name)
    }

    fn longest_name(&self) -> usize {
        self.placeholder
            .chars()
            .count()
            .max(self.names.longest_name())
    }
}

/// Converts `text` into tokens, classifying identifiers against `names`.
///
/// Identifier runs are split by longest match: a run directly followed by `(`
/// is a function name as a whole; otherwise the longest prefix that is a known
/// name becomes a variable and scanning resumes right after it.
pub fn tokenize<K: KnownNames + ?Sized>(text: &str, names: &K) -> Result<TokenSequence, LexError> {
    debug!("Tokenizing expression: {}", text);
    let tokens = Lexer::new(text, names).run()?;
    debug!("Produced {} tokens", tokens.len());
    Ok(TokenSequence { tokens })
}

struct Lexer<'a, K: KnownNames + ?Sized> {
    chars: Vec<char>,
    pos: usize,
    names: &'a K,
    longest: usize,
    tokens: Vec<Token>,
}

impl<'a, K: KnownNames + ?Sized> Lexer<'a, K> {
    fn new(text: &str, names: &'a K) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            names,
            longest: names.longest_name(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if let Some(kind) = TokenKind::from_symbol(c) {
                self.push(kind, c.to_string(), self.pos);
                self.pos += 1;
            } else if c.is_ascii_digit() {
                self.scan_number()?;
            } else {
                self.scan_identifier()?;
            }
        }
        self.push(TokenKind::EndOfInput, String::new(), self.chars.len());
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn push(&mut self, kind: TokenKind, text: String, position: usize) {
        let token = Token::new(kind, text, position);
        trace!("Token: {}", token);
        self.tokens.push(token);
    }

    fn scan_number(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let mut dots = 0;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => dots += 1,
                _ => break,
            }
            self.pos += 1;
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        if dots > 1 || literal.parse::<f64>().is_err() {
            return Err(LexError::MalformedNumber {
                literal,
                position: start,
            });
        }
        self.push(TokenKind::Number, literal, start);
        Ok(())
    }

    fn scan_identifier(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let end = self.chars[start..]
            .iter()
            .position(|c| !c.is_alphabetic())
            .map_or(self.chars.len(), |offset| start + offset);

        if end == start {
            return Err(LexError::UnexpectedCharacter {
                ch: self.chars[start],
                position: start,
            });
        }

        let called = self.chars.get(end) == Some(&'(');
        while self.pos < end {
            let at = self.pos;
            if called {
                let name: String = self.chars[at..end].iter().collect();
                self.push(TokenKind::Function, name, at);
                self.pos = end;
                break;
            }

            let window: String = self.chars[at..end.min(at + self.longest)].iter().collect();
            let matched = window
                .char_indices()
                .map(|(offset, c)| offset + c.len_utf8())
                .rev()
                .map(|stop| &window[..stop])
                .find(|name| self.names.is_known(name))
                .map(str::to_string);

            match matched {
                Some(name) => {
                    self.pos += name.chars().count();
                    self.push(TokenKind::Variable, name, at);
                }
                None => {
                    return Err(LexError::UnrecognizedIdentifier {
                        name: self.chars[at..end].iter().collect(),
                        position: at,
                    })
                }
            }
        }
        Ok(())
    }
}
