use crate::{
    interpreter::{RuntimeError, RuntimeErrorKind},
    lexer::{LexicalError, LexicalErrorKind},
    parser::{ParserError, ParserErrorKind},
    token::{Span, TokenKind},
};
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::fmt::Display;

/// An error that can be pointed at in the source text.
pub trait Diagnostic: Display {
    fn code(&self) -> &'static str;
    fn span(&self) -> Span;
    fn message(&self) -> String;
    /// Short note attached to the highlighted source.
    fn label(&self) -> String;
}

impl Diagnostic for LexicalError {
    fn code(&self) -> &'static str {
        LexicalError::code(self)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }

    fn label(&self) -> String {
        match self.kind {
            LexicalErrorKind::Unrecognized(c) => format!("{c:?} does not start any token"),
            LexicalErrorKind::UnclosedString => "string starts here".into(),
        }
    }
}

impl Diagnostic for ParserError {
    fn code(&self) -> &'static str {
        ParserError::code(self)
    }

    fn span(&self) -> Span {
        self.token.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }

    fn label(&self) -> String {
        let found = match self.token.kind {
            TokenKind::Eof => "end of file".into(),
            _ => format!("'{}'", self.token.lexeme),
        };
        match self.kind {
            ParserErrorKind::UnexpectedToken { expected, .. } => {
                format!("expected {expected} but found {found}")
            }
            ParserErrorKind::NonExpression => format!("{found} does not start an expression"),
            ParserErrorKind::InvalidLValue => "left side is not a variable".into(),
            ParserErrorKind::TooManyArguments { limit }
            | ParserErrorKind::TooManyParameters { limit } => {
                format!("this goes past the limit of {limit}")
            }
        }
    }
}

impl Diagnostic for RuntimeError {
    fn code(&self) -> &'static str {
        RuntimeError::code(self)
    }

    fn span(&self) -> Span {
        self.token.span
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }

    fn label(&self) -> String {
        match &self.kind {
            RuntimeErrorKind::NonNumeric(operand) => {
                format!("operand is a {}", operand.type_name())
            }
            RuntimeErrorKind::NonNumerics(lhs, rhs) | RuntimeErrorKind::NonAddable(lhs, rhs) => {
                format!("operands are a {} and a {}", lhs.type_name(), rhs.type_name())
            }
            RuntimeErrorKind::UndefinedVariable(_) => "not defined in any enclosing scope".into(),
            RuntimeErrorKind::InvalidCallee(callee) => format!("callee is a {}", callee.type_name()),
            RuntimeErrorKind::InvalidArgumentCount { actual, expected } => {
                format!("called with {actual} instead of {expected}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DiagnosticFormat {
    /// `[line N] Error: message` lines.
    #[default]
    Plain,
    /// Annotated source snippets.
    Pretty,
}

#[derive(Debug, Clone)]
pub struct DiagnosticFormatter {
    format: DiagnosticFormat,
    path: String,
    color: bool,
}

impl DiagnosticFormatter {
    pub fn new(format: DiagnosticFormat) -> Self {
        Self {
            format,
            path: "<input>".into(),
            color: true,
        }
    }

    /// Sets the source name shown in pretty reports.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn format<D: Diagnostic>(&self, source: &str, diagnostic: &D) -> String {
        match self.format {
            DiagnosticFormat::Plain => diagnostic.to_string(),
            DiagnosticFormat::Pretty => match self.format_pretty(source, diagnostic) {
                Ok(report) => report,
                Err(error) => {
                    tracing::warn!(%error, "failed to render report");
                    diagnostic.to_string()
                }
            },
        }
    }

    fn format_pretty<D: Diagnostic>(&self, source: &str, diagnostic: &D) -> std::io::Result<String> {
        let path = self.path.as_str();
        let span = diagnostic.span();
        let start = span.start.min(source.len());
        let range = start..span.end().clamp(start, source.len());

        let mut output = Vec::new();
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_config(
                Config::default()
                    .with_color(self.color)
                    .with_index_type(IndexType::Byte),
            )
            .with_code(diagnostic.code())
            .with_message(diagnostic.message())
            .with_label(
                Label::new((path, range))
                    .with_message(diagnostic.label())
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(source)), &mut output)?;
        Ok(String::from_utf8_lossy(&output).trim_end().to_string())
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(DiagnosticFormat::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser::Parser};

    fn parser_errors(source: &str) -> Vec<ParserError> {
        Parser::new(Lexer::new(source).scan().tokens).parse().1
    }

    #[test]
    fn plain_parse_error_at_end() {
        let errors = parser_errors("print 1");
        let formatter = DiagnosticFormatter::default();
        assert_eq!(
            formatter.format("print 1", &errors[0]),
            "[line 1] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn plain_parse_error_at_token() {
        let errors = parser_errors("var 1 = 2;");
        let formatter = DiagnosticFormatter::default();
        assert_eq!(
            formatter.format("var 1 = 2;", &errors[0]),
            "[line 1] Error at '1': Expect variable name."
        );
    }

    #[test]
    fn pretty_report_carries_code_and_label() {
        let source = "var a = (1 + 2;";
        let errors = parser_errors(source);
        let formatter = DiagnosticFormatter::new(DiagnosticFormat::Pretty)
            .with_path("test.lox")
            .with_color(false);
        let report = formatter.format(source, &errors[0]);
        assert!(report.contains("PA001"), "{report}");
        assert!(report.contains("Expect ')' after expression."), "{report}");
        assert!(report.contains("expected RIGHT_PAREN but found ';'"), "{report}");
        assert!(report.contains("test.lox"), "{report}");
    }

    #[test]
    fn pretty_lexical_report() {
        let source = "var a = \"open";
        let errors = Lexer::new(source).scan().errors;
        let formatter = DiagnosticFormatter::new(DiagnosticFormat::Pretty).with_color(false);
        let report = formatter.format(source, &errors[0]);
        assert!(report.contains("LX002"), "{report}");
        assert!(report.contains("Unterminated string."), "{report}");
    }
}
