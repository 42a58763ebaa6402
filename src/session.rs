use crate::{
    diagnostic::{Diagnostic, DiagnosticFormatter},
    interpreter::{SystemContext, TreeWalkInterpreter},
    lexer::{Lexer, ScannedTokens},
    parser::Parser,
};
use tracing::debug;

/// The outcome of running one piece of source through the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Lexing or parsing failed, so nothing was executed.
    StaticError,
    RuntimeError,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::StaticError => 65,
            RunStatus::RuntimeError => 70,
        }
    }
}

/// Owns everything that persists between runs: the global scope, the host context and the error
/// flags.
pub struct Session<C: SystemContext> {
    interpreter: TreeWalkInterpreter,
    context: C,
    formatter: DiagnosticFormatter,
    had_error: bool,
    had_runtime_error: bool,
}

impl<C: SystemContext> Session<C> {
    pub fn new(context: C) -> Self {
        Self {
            interpreter: TreeWalkInterpreter::new(),
            context,
            formatter: DiagnosticFormatter::default(),
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn with_formatter(mut self, formatter: DiagnosticFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forgets earlier lexical and syntax errors. Runtime state is kept.
    pub fn reset_static_error(&mut self) {
        self.had_error = false;
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Lexes, parses and, if neither reported an error, executes `source`.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run(&mut self, source: &str) -> RunStatus {
        let ScannedTokens { tokens, errors } = Lexer::new(source).scan();
        debug!(tokens = tokens.len(), errors = errors.len(), "scanned source");
        for error in &errors {
            self.report(source, error);
        }

        let (program, errors) = Parser::new(tokens).parse();
        debug!(statements = program.len(), errors = errors.len(), "parsed program");
        for error in &errors {
            self.report(source, error);
        }

        if self.had_error {
            debug!("skipping execution after static errors");
            return RunStatus::StaticError;
        }

        match self.interpreter.interpret(&program, &mut self.context) {
            Ok(_) => RunStatus::Success,
            Err(error) => {
                debug!(code = error.code(), line = error.token.line, "runtime error");
                self.had_runtime_error = true;
                let text = self.formatter.format(source, &error);
                self.context.ewriteln(&text);
                RunStatus::RuntimeError
            }
        }
    }

    fn report<D: Diagnostic>(&mut self, source: &str, diagnostic: &D) {
        self.had_error = true;
        let text = self.formatter.format(source, diagnostic);
        self.context.ewriteln(&text);
    }
}
