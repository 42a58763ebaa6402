use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use treelox::{
    interpreter::BufferedContext,
    session::{RunStatus, Session},
};

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_block() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/block");
    test_engine(input_dir)
}

#[test]
fn test_bool() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/bool");
    test_engine(input_dir)
}

#[test]
fn test_call() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/call");
    test_engine(input_dir)
}

#[test]
fn test_closure() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/closure");
    test_engine(input_dir)
}

#[test]
fn test_comments() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comments");
    test_engine(input_dir)
}

#[test]
fn test_for() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/for");
    test_engine(input_dir)
}

#[test]
fn test_function() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/function");
    test_engine(input_dir)
}

#[test]
fn test_if() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/if");
    test_engine(input_dir)
}

#[test]
fn test_logical_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/logical_operator");
    test_engine(input_dir)
}

#[test]
fn test_nil() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/nil");
    test_engine(input_dir)
}

#[test]
fn test_number() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/number");
    test_engine(input_dir)
}

#[test]
fn test_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/operator");
    test_engine(input_dir)
}

#[test]
fn test_print() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/print");
    test_engine(input_dir)
}

#[test]
fn test_return() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/return");
    test_engine(input_dir)
}

#[test]
fn test_runtime() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/runtime");
    test_engine(input_dir)
}

#[test]
fn test_static() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/static");
    test_engine(input_dir)
}

#[test]
fn test_string() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/string");
    test_engine(input_dir)
}

#[test]
fn test_variable() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/variable");
    test_engine(input_dir)
}

#[test]
fn test_while() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/while");
    test_engine(input_dir)
}

struct TestCase {
    name: String,
    source: String,
    output: String,
    compiler_errors: String,
    runtime_errors: String,
}

impl TestCase {
    fn expected_status(&self) -> RunStatus {
        if !self.compiler_errors.is_empty() {
            RunStatus::StaticError
        } else if !self.runtime_errors.is_empty() {
            RunStatus::RuntimeError
        } else {
            RunStatus::Success
        }
    }

    pub fn check(&self) {
        let mut session = Session::new(BufferedContext::new());
        let status = session.run(&self.source);
        let context = session.into_context();

        let expected_errors = match self.expected_status() {
            RunStatus::StaticError => &self.compiler_errors,
            _ => &self.runtime_errors,
        };
        assert_eq!(
            expected_errors,
            context.errors().trim_end(),
            "Failed test {} at diagnostics.",
            self.name,
        );
        assert_eq!(
            self.expected_status(),
            status,
            "Failed test {} with the wrong status.",
            self.name,
        );
        assert_eq!(
            self.output,
            context.output(),
            "Failed test {} at print.",
            self.name
        );
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "lox" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "Some interpreter test cases failed.");

    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut source_lines = Vec::new();
    let mut expected_outputs = Vec::new();
    let mut expected_compiler_errors = Vec::new();
    let mut expected_runtime_errors = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        let line_number = line_index + 1;
        if let Some(comment_index) = line.find("// expect:") {
            let expected = line[comment_index + "// expect:".len()..].trim();
            expected_outputs.push(expected.to_string());
        } else if let Some(comment_index) = line.find("// Error") {
            let expected = line[comment_index + "// ".len()..].trim();
            expected_compiler_errors.push(format!("[line {line_number}] {expected}"));
        } else if let Some(comment_index) = line.find("// [line ") {
            let expected = line[comment_index + "// ".len()..].trim();
            expected_compiler_errors.push(expected.to_string());
        } else if let Some(comment_index) = line.find("// expect runtime error:") {
            let expected = line[comment_index + "// expect runtime error:".len()..].trim();
            expected_runtime_errors.push(format!("{expected}\n[line {line_number}]"));
        }
        source_lines.push(line);
    }

    expected_outputs.push(String::new());
    Ok(TestCase {
        name: test_name.into_owned(),
        source: source_lines.join("\n"),
        output: expected_outputs.join("\n"),
        compiler_errors: expected_compiler_errors.join("\n"),
        runtime_errors: expected_runtime_errors.join("\n"),
    })
}
