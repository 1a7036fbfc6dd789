//! Ripple CLI - interactive pipeline shell
//!
//! Usage:
//!   ripple -c 'echo hello | wc'    # Execute a command string
//!   ripple script.rsh              # Execute a script file, line by line
//!   ripple                         # Interactive REPL

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ripple::{ExecResult, Shell};

/// Ripple - interactive shell with concurrent pipelines
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Execute the given command string
    #[arg(short = 'c')]
    command: Option<String>,

    /// Script file to execute
    #[arg()]
    script: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // Errors only if a logger is already set, which cannot happen here.
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}

fn report(result: &ExecResult) {
    if let Some(message) = &result.error {
        eprintln!("ripple: {message}");
    }
}

/// Feed a multi-line source through the shell one line at a time,
/// stopping early when a line asks the session to end.
async fn run_source(shell: &Shell, source: &str) -> ExecResult {
    let mut last = ExecResult::ok();
    for line in source.lines() {
        last = shell.eval(line).await;
        report(&last);
        if last.should_exit {
            break;
        }
    }
    last
}

async fn repl(shell: &Shell) -> Result<ExecResult> {
    let stdin = std::io::stdin();
    let mut last = ExecResult::ok();
    loop {
        print!("$ ");
        std::io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .read_line(&mut line)
            .context("failed to read input line")?;
        if read == 0 {
            // EOF ends the session with the last command's status.
            println!();
            return Ok(last);
        }

        last = shell.eval(line.trim_end_matches('\n')).await;
        report(&last);
        if last.should_exit {
            return Ok(last);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let shell = Shell::new();

    if let Some(command) = args.command {
        let result = run_source(&shell, &command).await;
        std::process::exit(result.exit_code);
    }

    if let Some(script_path) = args.script {
        let script = std::fs::read_to_string(&script_path)
            .with_context(|| format!("failed to read script: {}", script_path.display()))?;
        let result = run_source(&shell, &script).await;
        std::process::exit(result.exit_code);
    }

    let result = repl(&shell).await?;
    std::process::exit(result.exit_code);
}
