use color_eyre::Result;
use proptest::prelude::*;
use treelox::{
    diagnostic::{DiagnosticFormat, DiagnosticFormatter},
    interpreter::BufferedContext,
    session::{RunStatus, Session},
};

fn session() -> Session<BufferedContext> {
    Session::new(BufferedContext::new())
}

#[test]
fn exit_codes() {
    assert_eq!(RunStatus::Success.exit_code(), 0);
    assert_eq!(RunStatus::StaticError.exit_code(), 65);
    assert_eq!(RunStatus::RuntimeError.exit_code(), 70);
}

#[test]
fn interactive_lines_share_globals() -> Result<()> {
    let mut session = session();
    assert_eq!(session.run("var a = 1;"), RunStatus::Success);
    assert_eq!(session.run("fun inc() { a = a + 1; }"), RunStatus::Success);
    assert_eq!(session.run("inc(); inc();"), RunStatus::Success);
    assert_eq!(session.run("print a;"), RunStatus::Success);
    assert_eq!(session.context().output(), "3\n");
    Ok(())
}

#[test]
fn static_error_flag_resets_between_lines() -> Result<()> {
    let mut session = session();
    assert_eq!(session.run("var a = \"kept\";"), RunStatus::Success);

    assert_eq!(session.run("print ;"), RunStatus::StaticError);
    assert!(session.had_error());
    assert_eq!(
        session.context().errors(),
        "[line 1] Error at ';': Expect expression.\n"
    );

    // Until the flag is cleared nothing runs.
    assert_eq!(session.run("print a;"), RunStatus::StaticError);
    assert_eq!(session.context().output(), "");

    session.reset_static_error();
    assert!(!session.had_error());
    assert_eq!(session.run("print a;"), RunStatus::Success);
    assert_eq!(session.context().output(), "kept\n");
    Ok(())
}

#[test]
fn runtime_error_keeps_earlier_output() -> Result<()> {
    let mut session = session();
    let status = session.run("print \"before\";\nprint missing;\nprint \"after\";");
    assert_eq!(status, RunStatus::RuntimeError);
    assert!(session.had_runtime_error());
    assert!(!session.had_error());
    assert_eq!(session.context().output(), "before\n");
    assert_eq!(
        session.context().errors(),
        "Undefined variable 'missing'.\n[line 2]\n"
    );

    // A later line still runs against the same globals.
    assert_eq!(session.run("print \"again\";"), RunStatus::Success);
    Ok(())
}

#[test]
fn sessions_do_not_share_state() -> Result<()> {
    let mut first = session();
    let mut second = session();
    assert_eq!(first.run("var shared = 1; print ;"), RunStatus::StaticError);
    assert_eq!(first.run("var shared = 1;"), RunStatus::StaticError);

    assert!(!second.had_error());
    assert_eq!(second.run("print shared;"), RunStatus::RuntimeError);
    assert_eq!(second.run("var shared = 2; print shared;"), RunStatus::Success);
    assert_eq!(second.context().output(), "2\n");
    Ok(())
}

#[test]
fn closures_capture_the_environment() -> Result<()> {
    let mut session = session();
    let source = r#"
fun makeCounter() {
  var i = 0;
  fun count() {
    i = i + 1;
    print i;
  }
  return count;
}
var counter = makeCounter();
counter();
counter();
"#;
    assert_eq!(session.run(source), RunStatus::Success);
    assert_eq!(session.into_context().into_data(), "1\n2\n");
    Ok(())
}

#[test]
fn pretty_runtime_diagnostic() -> Result<()> {
    let formatter = DiagnosticFormatter::new(DiagnosticFormat::Pretty)
        .with_path("script.lox")
        .with_color(false);
    let mut session = session().with_formatter(formatter);
    assert_eq!(session.run("var a = 1;\nprint a + \"b\";"), RunStatus::RuntimeError);

    let errors = session.context().errors();
    assert!(errors.contains("RT003"), "{errors}");
    assert!(
        errors.contains("Operands must be two numbers or two strings."),
        "{errors}"
    );
    assert!(errors.contains("operands are a number and a string"), "{errors}");
    assert!(errors.contains("script.lox"), "{errors}");
    Ok(())
}

#[test]
fn lexical_and_syntax_errors_are_all_reported() -> Result<()> {
    let mut session = session();
    let status = session.run("print 1 @;\nvar = 2;\nprint 3;");
    assert_eq!(status, RunStatus::StaticError);
    assert_eq!(
        session.context().errors(),
        "[line 1] Error: Unexpected character.\n[line 2] Error at '=': Expect variable name.\n"
    );
    assert_eq!(session.context().output(), "");
    Ok(())
}

// Property-based tests

fn operator_strategy() -> impl Strategy<Value = char> {
    prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')]
}

fn comparison_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("<"), Just("<="), Just(">"), Just(">="), Just("=="), Just("!=")]
}

proptest! {
    #[test]
    fn arithmetic_matches_ieee(
        a in -1.0e6f64..1.0e6,
        b in prop_oneof![Just(0.0f64), -1.0e6f64..1.0e6],
        op in operator_strategy(),
    ) {
        let mut session = session();
        prop_assert_eq!(session.run(&format!("print {a} {op} {b};")), RunStatus::Success);

        let expected = match op {
            '+' => (a + b).to_string(),
            '-' => (a - b).to_string(),
            '*' => (a * b).to_string(),
            _ if b == 0.0 => "nil".to_string(),
            _ => (a / b).to_string(),
        };
        prop_assert_eq!(session.context().output(), format!("{expected}\n"));
    }

    #[test]
    fn comparisons_match_ieee(
        a in -1.0e3f64..1.0e3,
        b in -1.0e3f64..1.0e3,
        op in comparison_strategy(),
    ) {
        let mut session = session();
        prop_assert_eq!(session.run(&format!("print {a} {op} {b};")), RunStatus::Success);

        let expected = match op {
            "<" => a < b,
            "<=" => a <= b,
            ">" => a > b,
            ">=" => a >= b,
            "==" => a == b,
            _ => a != b,
        };
        prop_assert_eq!(session.context().output(), format!("{expected}\n"));
    }
}
