//! echo builtin command

use async_trait::async_trait;

use super::{Command, Context};
use crate::executor::ExecResult;

/// The echo builtin: arguments space-joined, newline-terminated.
pub struct Echo;

#[async_trait]
impl Command for Echo {
    async fn execute(&self, ctx: Context) -> ExecResult {
        let mut line = ctx.args.join(" ");
        line.push('\n');

        match ctx.output.write(&line).await {
            Ok(()) => ExecResult::ok(),
            Err(err) => ExecResult::err(1, format!("echo: {err}")),
        }
    }
}
