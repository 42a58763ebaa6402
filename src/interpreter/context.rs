use super::SystemContext;

pub struct StdioContext;

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }

    fn ewriteln(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

/// Collects program output and diagnostics in memory.
#[derive(Debug, Default)]
pub struct BufferedContext {
    output: String,
    errors: String,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn errors(&self) -> &str {
        &self.errors
    }

    pub fn clear(&mut self) {
        self.output.clear();
        self.errors.clear();
    }

    pub fn into_data(self) -> String {
        self.output
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn ewriteln(&mut self, text: &str) {
        self.errors.push_str(text);
        self.errors.push('\n');
    }
}
