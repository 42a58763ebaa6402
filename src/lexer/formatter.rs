use super::LexicalError;
use crate::token::Token;

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

/// Prints tokens as `KIND lexeme literal`, e.g. `NUMBER 1 1.0` or `EOF  null`.
pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error}")
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

/// Prefixes every token with the line it was scanned on.
pub struct LineFormatter;

impl TokenFormatter for LineFormatter {
    fn format(&self, token: &Token) -> String {
        format!("({}) {token}", token.line)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("({}) ERROR {} {}", error.line, error.code(), error.kind)
    }
}
