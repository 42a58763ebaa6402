use super::value::LoxValue;
use crate::token::Token;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    NonNumeric(LoxValue),
    #[error("Operands must be numbers.")]
    NonNumerics(LoxValue, LoxValue),
    #[error("Operands must be two numbers or two strings.")]
    NonAddable(LoxValue, LoxValue),
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(CompactString),
    #[error("Can only call functions and classes.")]
    InvalidCallee(LoxValue),
    #[error("Expected {expected} arguments but got {actual}.")]
    InvalidArgumentCount { actual: usize, expected: usize },
}

#[derive(Debug, Error, Clone)]
#[error("{kind}\n[line {}]", .token.line)]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    /// The token the failing operation was attributed to.
    pub token: Token,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::NonNumeric(_) => "RT001",
            RuntimeErrorKind::NonNumerics(_, _) => "RT002",
            RuntimeErrorKind::NonAddable(_, _) => "RT003",
            RuntimeErrorKind::UndefinedVariable(_) => "RT004",
            RuntimeErrorKind::InvalidCallee(_) => "RT005",
            RuntimeErrorKind::InvalidArgumentCount { .. } => "RT006",
        }
    }
}
