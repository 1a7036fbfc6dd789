//! External process fallback
//!
//! Every command name resolves to something executable: when the registry
//! has no builtin for a name, this handler delegates to the operating
//! system. The child inherits the process environment overlaid with the
//! shell's variable snapshot, and its stdio is bridged to the stage's
//! channel pair.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command as OsCommand;

use super::{Command, Context};
use crate::executor::ExecResult;

/// Shared handler for unregistered command names.
pub struct External;

#[async_trait]
impl Command for External {
    async fn execute(&self, ctx: Context) -> ExecResult {
        let mut child = match OsCommand::new(&ctx.name)
            .args(&ctx.args)
            .envs(ctx.env.snapshot())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return ExecResult::err(127, format!("{}: command not found", ctx.name));
            }
            Err(err) => return ExecResult::err(1, format!("{}: {err}", ctx.name)),
        };
        tracing::debug!(name = %ctx.name, "spawned external process");

        // Pump the upstream channel into the child's stdin on a side task so
        // the child's stdout can be drained concurrently; feeding and
        // draining sequentially can stall on a full OS pipe.
        let child_stdin = child.stdin.take();
        let input = Arc::clone(&ctx.input);
        let feeder = tokio::spawn(async move {
            let Some(mut stdin) = child_stdin else {
                return;
            };
            loop {
                let chunk = input.read().await;
                if chunk.is_empty() && input.is_closed() {
                    break;
                }
                if stdin.write_all(chunk.as_bytes()).await.is_err() {
                    // Child stopped reading; it will report its own status.
                    break;
                }
            }
            // Dropping the handle closes the child's stdin.
        });

        let mut copy_error = None;
        if let Some(mut stdout) = child.stdout.take() {
            let mut buf = [0u8; 8192];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        let text = String::from_utf8_lossy(&buf[..n]);
                        if let Err(err) = ctx.output.write(&text).await {
                            copy_error = Some(err.to_string());
                            break;
                        }
                    }
                    Err(err) => {
                        copy_error = Some(err.to_string());
                        break;
                    }
                }
            }
        }

        let status = child.wait().await;

        // The upstream may never close (an interactive stdin endpoint, say);
        // once the child is gone there is nothing left to feed.
        feeder.abort();

        if let Some(message) = copy_error {
            return ExecResult::err(1, format!("{}: {message}", ctx.name));
        }
        match status {
            Ok(status) => ExecResult {
                // A signal death has no code; report failure.
                exit_code: status.code().unwrap_or(1),
                should_exit: false,
                error: None,
            },
            Err(err) => ExecResult::err(1, format!("{}: {err}", ctx.name)),
        }
    }
}
