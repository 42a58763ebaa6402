mod context;
mod environment;
mod error;
mod native;
mod tree;
mod value;

pub use context::{BufferedContext, StdioContext};
pub use environment::Environment;
pub use error::{RuntimeError, RuntimeErrorKind};
pub use native::NativeClock;
pub use tree::TreeWalkInterpreter;
pub use value::{Function, LoxValue, NativeFunction};

/// How a statement finished executing.
#[derive(Debug, Clone)]
pub enum ProgramState {
    Run,
    /// A `return` statement is unwinding to the nearest call boundary.
    Return(LoxValue),
}

/// The host side of a running program: where printed values and diagnostics go.
pub trait SystemContext {
    /// Writes a line of program output.
    fn writeln(&mut self, text: &str);
    /// Writes a line of diagnostic output.
    fn ewriteln(&mut self, text: &str);
}
