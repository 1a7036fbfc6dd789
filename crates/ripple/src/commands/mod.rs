//! Command handlers
//!
//! This module provides the [`Command`] trait implemented by the builtin
//! commands and by the [`External`] process fallback, plus the [`Context`]
//! each stage receives.
//!
//! # Contract
//!
//! A command reads its [`Context::input`] to end-of-stream if it consumes it,
//! writes results to [`Context::output`], and converts every internal failure
//! into an [`ExecResult`] exit code - faults never cross this boundary. The
//! executor owns closing the output channel; handlers must not.
//!
//! # Custom commands
//!
//! ```rust
//! use ripple::{async_trait, Command, Context, ExecResult};
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Command for Greet {
//!     async fn execute(&self, ctx: Context) -> ExecResult {
//!         let name = ctx.args.first().map(String::as_str).unwrap_or("world");
//!         match ctx.output.write(&format!("hello, {name}\n")).await {
//!             Ok(()) => ExecResult::ok(),
//!             Err(err) => ExecResult::err(1, err.to_string()),
//!         }
//!     }
//! }
//! ```
//!
//! Register via [`ShellBuilder::command`](crate::ShellBuilder::command).

mod cat;
mod echo;
mod exit;
mod external;
mod grep;
mod pwd;
mod wc;

pub use cat::Cat;
pub use echo::Echo;
pub use exit::Exit;
pub use external::External;
pub use grep::Grep;
pub use pwd::Pwd;
pub use wc::Wc;

use std::sync::Arc;

use async_trait::async_trait;

use crate::env::Environment;
use crate::executor::channel::{InputChannel, OutputChannel};
use crate::executor::ExecResult;

/// Execution context for one pipeline stage.
pub struct Context {
    /// The command name after variable expansion. Builtins rarely need it;
    /// the external handler uses it as argv[0].
    pub name: String,

    /// Expanded arguments, not including the command name.
    pub args: Vec<String>,

    /// Upstream channel (the previous stage, or the stdin endpoint).
    pub input: Arc<dyn InputChannel>,

    /// Downstream channel (the next stage, or the stdout endpoint).
    pub output: Arc<dyn OutputChannel>,

    /// Shared variable store; external processes receive its snapshot.
    pub env: Arc<Environment>,
}

/// Trait implemented by every command handler, builtin or external.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: Context) -> ExecResult;
}

/// Read `input` to end-of-stream, returning everything buffered.
pub(crate) async fn drain(input: &dyn InputChannel) -> String {
    let mut out = String::new();
    loop {
        let chunk = input.read().await;
        if chunk.is_empty() && input.is_closed() {
            break;
        }
        out.push_str(&chunk);
    }
    out
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for builtin unit tests.

    use super::*;
    use crate::executor::Channel;

    /// Build a Context wired to fresh in-memory channels. The returned
    /// channels stay shared with the context for feeding input and
    /// inspecting output.
    pub fn context(args: &[&str]) -> (Context, Arc<Channel>, Arc<Channel>) {
        named_context("test", args)
    }

    pub fn named_context(name: &str, args: &[&str]) -> (Context, Arc<Channel>, Arc<Channel>) {
        let input = Arc::new(Channel::new());
        let output = Arc::new(Channel::new());
        let ctx = Context {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            input: Arc::clone(&input) as Arc<dyn InputChannel>,
            output: Arc::clone(&output) as Arc<dyn OutputChannel>,
            env: Arc::new(Environment::new()),
        };
        (ctx, input, output)
    }

    /// Collect everything a command wrote, assuming it has finished.
    pub async fn collect(output: &Arc<Channel>) -> String {
        OutputChannel::close(output.as_ref());
        drain(output.as_ref()).await
    }

    /// Feed input and close it, simulating an upstream stage that finished.
    pub async fn feed(input: &Arc<Channel>, data: &str) {
        input.write(data).await.expect("feed into open channel");
        OutputChannel::close(input.as_ref());
    }
}
