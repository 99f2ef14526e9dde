use thiserror::Error;

/// Failures raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("malformed numeric literal '{literal}' at position {position}")]
    MalformedNumber { literal: String, position: usize },

    #[error("unrecognized identifier '{name}' at position {position}")]
    UnrecognizedIdentifier { name: String, position: usize },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::MalformedNumber { position, .. }
            | LexError::UnrecognizedIdentifier { position, .. }
            | LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

/// Everything that can abort an evaluation.
///
/// Arithmetic anomalies are not represented here: division by zero, `ln(0)` and
/// friends yield IEEE `NaN`/`Infinity` values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected token '{found}' at position {position}")]
    Syntax { found: String, position: usize },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("resolver failed for '{name}': {reason}")]
    Resolver { name: String, reason: String },

    #[error("expression nesting exceeds the limit of {depth}")]
    RecursionLimit { depth: usize },
}

pub type Result<T, E = EvalError> = std::result::Result<T, E>;
