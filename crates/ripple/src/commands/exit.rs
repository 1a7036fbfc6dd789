//! exit builtin command

use async_trait::async_trait;

use super::{Command, Context};
use crate::executor::ExecResult;

/// The exit builtin: terminates the session with the given code.
///
/// An absent or unparseable argument exits with code 0.
pub struct Exit;

#[async_trait]
impl Command for Exit {
    async fn execute(&self, ctx: Context) -> ExecResult {
        let exit_code = ctx
            .args
            .first()
            .and_then(|arg| arg.parse::<i32>().ok())
            .unwrap_or(0);

        ExecResult::exit(exit_code)
    }
}
