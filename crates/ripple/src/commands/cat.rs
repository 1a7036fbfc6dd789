//! cat builtin command

use async_trait::async_trait;

use super::{Command, Context};
use crate::executor::ExecResult;

/// The cat builtin: streams standard input when no files are given,
/// otherwise writes each file's contents in order.
pub struct Cat;

#[async_trait]
impl Command for Cat {
    async fn execute(&self, ctx: Context) -> ExecResult {
        if ctx.args.is_empty() {
            // Stream chunk by chunk so a downstream consumer can start
            // before the upstream producer finishes.
            loop {
                let chunk = ctx.input.read().await;
                if chunk.is_empty() && ctx.input.is_closed() {
                    return ExecResult::ok();
                }
                if let Err(err) = ctx.output.write(&chunk).await {
                    return ExecResult::err(1, format!("cat: {err}"));
                }
            }
        }

        for file in &ctx.args {
            let content = match tokio::fs::read_to_string(file).await {
                Ok(content) => content,
                Err(err) => return ExecResult::err(1, format!("cat: {file}: {err}")),
            };
            if let Err(err) = ctx.output.write(&content).await {
                return ExecResult::err(1, format!("cat: {err}"));
            }
        }

        ExecResult::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{collect, context, feed};
    use std::io::Write;

    #[tokio::test]
    async fn streams_stdin_to_stdout() {
        let (ctx, input, output) = context(&[]);
        feed(&input, "line one\nline two\n").await;
        let result = Cat.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(collect(&output).await, "line one\nline two\n");
    }

    #[tokio::test]
    async fn reads_files_in_order() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        write!(a, "first\n").unwrap();
        write!(b, "second").unwrap();

        let (ctx, _, output) = context(&[
            a.path().to_str().unwrap(),
            b.path().to_str().unwrap(),
        ]);
        let result = Cat.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        // File contents pass through verbatim, trailing newline or not.
        assert_eq!(collect(&output).await, "first\nsecond");
    }

    #[tokio::test]
    async fn missing_file_is_exit_one() {
        let (ctx, _, _) = context(&["/no/such/file"]);
        let result = Cat.execute(ctx).await;
        assert_eq!(result.exit_code, 1);
        assert!(result.error.unwrap().contains("/no/such/file"));
    }
}
