use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("{message}")]
    UnexpectedToken {
        expected: TokenKind,
        message: &'static str,
    },
    #[error("Expect expression.")]
    NonExpression,
    #[error("Invalid assignment target.")]
    InvalidLValue,
    #[error("Can't have more than {limit} arguments.")]
    TooManyArguments { limit: usize },
    #[error("Can't have more than {limit} parameters.")]
    TooManyParameters { limit: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {}] Error{}: {kind}", .token.line, location(.token))]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    /// The token the parser was looking at when the error occurred.
    pub token: Token,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression => "PA002",
            ParserErrorKind::InvalidLValue => "PA003",
            ParserErrorKind::TooManyArguments { .. } => "PA004",
            ParserErrorKind::TooManyParameters { .. } => "PA005",
        }
    }
}

fn location(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => " at end".into(),
        _ => format!(" at '{}'", token.lexeme),
    }
}
