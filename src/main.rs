use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};
use treelox::diagnostic::{DiagnosticFormat, DiagnosticFormatter};
use treelox::interpreter::StdioContext;
use treelox::session::{RunStatus, Session};

#[derive(Debug, Parser)]
#[clap(name = "treelox", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: TreeloxCommand,
}

#[derive(Debug, Subcommand)]
pub enum TreeloxCommand {
    /// Print the tokens of a source file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the syntax tree of a source file.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
    /// Run a source file.
    Run {
        path: PathBuf,
        #[clap(long = "diagnostics", value_enum, default_value = "plain")]
        diagnostics: DiagnosticFormat,
    },
    /// Start an interactive prompt.
    Repl {
        #[clap(long = "diagnostics", value_enum, default_value = "plain")]
        diagnostics: DiagnosticFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let args = CLArgs::parse();
    let status = match args.routine {
        TreeloxCommand::Tokenize { path, format } => {
            tracing::info!(?path, "tokenizing");
            tokenize(&read_source(&path)?, &format)
        }
        TreeloxCommand::Parse { path, format } => {
            tracing::info!(?path, "parsing");
            parse(&read_source(&path)?, &format)
        }
        TreeloxCommand::Run { path, diagnostics } => {
            tracing::info!(?path, "running");
            let source = read_source(&path)?;
            let formatter =
                DiagnosticFormatter::new(diagnostics).with_path(path.display().to_string());
            Session::new(StdioContext)
                .with_formatter(formatter)
                .run(&source)
        }
        TreeloxCommand::Repl { diagnostics } => repl(diagnostics)?,
    };
    Ok(ExitCode::from(status.exit_code()))
}

/// Installs a stderr subscriber, but only when `RUST_LOG` asks for one.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_source(path: &Path) -> Result<String> {
    read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))
}

fn tokenize(src: &str, format: &TokenFormat) -> RunStatus {
    use treelox::lexer::formatter::{
        BasicFormatter, DebugFormatter, LineFormatter, TokenFormatter,
    };
    use treelox::lexer::Lexer;

    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter),
        TokenFormat::Line => Box::new(LineFormatter),
    };
    let mut status = RunStatus::Success;
    for token_or_error in Lexer::new(src) {
        match token_or_error {
            Ok(token) => println!("{}", formatter.format(&token)),
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                status = RunStatus::StaticError;
            }
        }
    }
    status
}

fn parse(src: &str, format: &ProgramFormat) -> RunStatus {
    use treelox::lexer::Lexer;
    use treelox::parser::formatter::{DebugFormatter, ProgramFormatter, SExpressionFormatter};
    use treelox::parser::Parser;

    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugFormatter),
        ProgramFormat::SExpr => Box::new(SExpressionFormatter),
    };
    let scanned = Lexer::new(src).scan();
    for error in &scanned.errors {
        eprintln!("{error}");
    }
    let (program, errors) = Parser::new(scanned.tokens).parse();
    for error in &errors {
        eprintln!("{error}");
    }
    if !scanned.errors.is_empty() || !errors.is_empty() {
        return RunStatus::StaticError;
    }
    for statement in &program {
        println!("{}", formatter.format_statement(statement));
    }
    RunStatus::Success
}

fn repl(diagnostics: DiagnosticFormat) -> Result<RunStatus> {
    let mut session =
        Session::new(StdioContext).with_formatter(DiagnosticFormatter::new(diagnostics));
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let _ = session.run(&line);
        session.reset_static_error();
    }
    Ok(RunStatus::Success)
}
