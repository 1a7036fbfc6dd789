//! Ripple - an interactive shell with concurrent pipeline execution
//!
//! Ripple parses one line of shell syntax into a pipeline, expands `$NAME`
//! variables against a two-tier (local/global) environment, and runs the
//! stages concurrently, connected by blocking byte-stream channels that
//! emulate POSIX pipes. Builtins cover `echo`, `cat`, `wc`, `pwd`, `exit`
//! and `grep`; every other name delegates to the operating system.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ripple::{Channel, InputChannel, OutputChannel, Shell};
//!
//! #[tokio::main]
//! async fn main() {
//!     let out = Arc::new(Channel::new());
//!     let shell = Shell::builder()
//!         .env("GREETING", "hello")
//!         .stdout(Arc::clone(&out) as Arc<dyn OutputChannel>)
//!         .build();
//!
//!     let result = shell.eval("echo $GREETING world").await;
//!     assert_eq!(result.exit_code, 0);
//!     assert_eq!(out.read().await, "hello world\n");
//! }
//! ```

pub mod commands;
mod env;
mod error;
pub mod executor;
mod expand;
pub mod parser;

pub use async_trait::async_trait;
pub use commands::{Command, Context};
pub use env::Environment;
pub use error::{Error, Result};
pub use executor::{
    Channel, ExecResult, InputChannel, OutputChannel, Registry, StdinChannel, StdoutChannel,
};
pub use parser::Pipeline;

use std::sync::Arc;

/// One shell session: environment, command registry and the stdio endpoints
/// used for pipeline heads and tails.
pub struct Shell {
    env: Arc<Environment>,
    registry: Arc<Registry>,
    stdin: Arc<dyn InputChannel>,
    stdout: Arc<dyn OutputChannel>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Create a shell with the standard builtins and real process stdio.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a ShellBuilder for customized configuration.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// The session's variable store.
    pub fn env(&self) -> &Arc<Environment> {
        &self.env
    }

    /// Parse one line into a pipeline, applying its assignments.
    ///
    /// Call [`Environment::clear_local`] once the line is fully processed;
    /// [`eval`](Shell::eval) does both ends of that for you.
    pub fn parse_line(&self, line: &str) -> Result<Pipeline> {
        parser::parse_line(line, &self.env)
    }

    /// Execute a parsed, non-empty pipeline.
    pub async fn run_pipeline(&self, pipeline: &Pipeline) -> ExecResult {
        executor::run_pipeline(
            &pipeline.commands,
            Arc::clone(&self.env),
            Arc::clone(&self.registry),
            Arc::clone(&self.stdin),
            Arc::clone(&self.stdout),
        )
        .await
    }

    /// Process one line: parse, execute, and clear statement-local bindings
    /// on every path out. A syntax error becomes exit code 1 with the error
    /// message attached; the session continues.
    pub async fn eval(&self, line: &str) -> ExecResult {
        let result = match self.parse_line(line) {
            Ok(pipeline) if pipeline.is_empty() => ExecResult::ok(),
            Ok(pipeline) => self.run_pipeline(&pipeline).await,
            Err(err) => ExecResult::err(1, err.to_string()),
        };
        self.env.clear_local();
        result
    }
}

/// Builder for customized Shell configuration.
#[derive(Default)]
pub struct ShellBuilder {
    globals: Vec<(String, String)>,
    commands: Vec<(String, Arc<dyn Command>)>,
    stdin: Option<Arc<dyn InputChannel>>,
    stdout: Option<Arc<dyn OutputChannel>>,
}

impl ShellBuilder {
    /// Set a global shell variable.
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.globals.push((name.into(), value.into()));
        self
    }

    /// Register a custom command, shadowing a builtin of the same name.
    pub fn command(mut self, name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        self.commands.push((name.into(), command));
        self
    }

    /// Override the pipeline-head input endpoint (defaults to process stdin).
    pub fn stdin(mut self, stdin: Arc<dyn InputChannel>) -> Self {
        self.stdin = Some(stdin);
        self
    }

    /// Override the pipeline-tail output endpoint (defaults to process
    /// stdout). Note that the tail stage closes its output when a pipeline
    /// finishes, so a [`Channel`] endpoint only captures one pipeline.
    pub fn stdout(mut self, stdout: Arc<dyn OutputChannel>) -> Self {
        self.stdout = Some(stdout);
        self
    }

    /// Build the Shell instance.
    pub fn build(self) -> Shell {
        let env = Arc::new(Environment::new());
        for (name, value) in self.globals {
            env.set_global(name, value);
        }

        let mut registry = Registry::new();
        registry.register("echo", Arc::new(commands::Echo));
        registry.register("cat", Arc::new(commands::Cat));
        registry.register("wc", Arc::new(commands::Wc));
        registry.register("pwd", Arc::new(commands::Pwd));
        registry.register("exit", Arc::new(commands::Exit));
        registry.register("grep", Arc::new(commands::Grep));
        for (name, command) in self.commands {
            registry.register(name, command);
        }

        Shell {
            env,
            registry: Arc::new(registry),
            stdin: self
                .stdin
                .unwrap_or_else(|| Arc::new(StdinChannel::new())),
            stdout: self
                .stdout
                .unwrap_or_else(|| Arc::new(StdoutChannel::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured_shell() -> (Shell, Arc<Channel>) {
        let stdin = Arc::new(Channel::new());
        InputChannel::close(stdin.as_ref());
        let stdout = Arc::new(Channel::new());
        let shell = Shell::builder()
            .stdin(stdin as Arc<dyn InputChannel>)
            .stdout(Arc::clone(&stdout) as Arc<dyn OutputChannel>)
            .build();
        (shell, stdout)
    }

    #[tokio::test]
    async fn eval_echo() {
        let (shell, out) = captured_shell();
        let result = shell.eval("echo hello").await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(out.read().await, "hello\n");
    }

    #[tokio::test]
    async fn eval_blank_line_is_ok() {
        let (shell, out) = captured_shell();
        let result = shell.eval("   ").await;
        assert_eq!(result, ExecResult::ok());
        // Nothing executed; the endpoint is untouched and still open.
        assert!(!out.is_closed());
    }

    #[tokio::test]
    async fn eval_syntax_error_reports_and_continues() {
        let (shell, _) = captured_shell();
        let result = shell.eval("echo 'unterminated").await;
        assert_eq!(result.exit_code, 1);
        assert!(!result.should_exit);
        assert!(result.error.unwrap().contains("syntax error"));
    }

    #[tokio::test]
    async fn eval_clears_locals_after_the_line() {
        let (shell, out) = captured_shell();
        let result = shell.eval("X=1 echo $X").await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(out.read().await, "1\n");
        assert!(shell.env().get_var("X").is_none());
    }

    #[tokio::test]
    async fn custom_command_shadows_builtin() {
        struct Fake;

        #[crate::async_trait]
        impl Command for Fake {
            async fn execute(&self, ctx: Context) -> ExecResult {
                let _ = ctx.output.write("faked\n").await;
                ExecResult::ok()
            }
        }

        let stdin = Arc::new(Channel::new());
        InputChannel::close(stdin.as_ref());
        let stdout = Arc::new(Channel::new());
        let shell = Shell::builder()
            .command("echo", Arc::new(Fake))
            .stdin(stdin as Arc<dyn InputChannel>)
            .stdout(Arc::clone(&stdout) as Arc<dyn OutputChannel>)
            .build();

        shell.eval("echo real").await;
        assert_eq!(stdout.read().await, "faked\n");
    }
}
