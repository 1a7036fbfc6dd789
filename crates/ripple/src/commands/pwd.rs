//! pwd builtin command

use async_trait::async_trait;

use super::{Command, Context};
use crate::executor::ExecResult;

/// The pwd builtin: the process's current working directory.
pub struct Pwd;

#[async_trait]
impl Command for Pwd {
    async fn execute(&self, ctx: Context) -> ExecResult {
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(err) => return ExecResult::err(1, format!("pwd: {err}")),
        };

        let line = format!("{}\n", cwd.display());
        match ctx.output.write(&line).await {
            Ok(()) => ExecResult::ok(),
            Err(err) => ExecResult::err(1, format!("pwd: {err}")),
        }
    }
}
