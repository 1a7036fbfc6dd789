//! wc builtin command

use async_trait::async_trait;

use super::{drain, Command, Context};
use crate::executor::ExecResult;

/// The wc builtin: line, word and byte counts for stdin or for each file,
/// plus a total row when more than one file is given.
pub struct Wc;

#[derive(Default, Clone, Copy)]
struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Counts {
    fn of(content: &str) -> Self {
        Self {
            lines: content.matches('\n').count(),
            words: content.split_whitespace().count(),
            bytes: content.len(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }

    fn row(&self, label: Option<&str>) -> String {
        match label {
            Some(label) => format!("{} {} {} {}\n", self.lines, self.words, self.bytes, label),
            None => format!("{} {} {}\n", self.lines, self.words, self.bytes),
        }
    }
}

#[async_trait]
impl Command for Wc {
    async fn execute(&self, ctx: Context) -> ExecResult {
        if ctx.args.is_empty() {
            let content = drain(ctx.input.as_ref()).await;
            let row = Counts::of(&content).row(None);
            return match ctx.output.write(&row).await {
                Ok(()) => ExecResult::ok(),
                Err(err) => ExecResult::err(1, format!("wc: {err}")),
            };
        }

        let mut total = Counts::default();
        for file in &ctx.args {
            let content = match tokio::fs::read_to_string(file).await {
                Ok(content) => content,
                Err(err) => return ExecResult::err(1, format!("wc: {file}: {err}")),
            };
            let counts = Counts::of(&content);
            total.add(counts);
            if let Err(err) = ctx.output.write(&counts.row(Some(file))).await {
                return ExecResult::err(1, format!("wc: {err}"));
            }
        }

        if ctx.args.len() > 1 {
            if let Err(err) = ctx.output.write(&total.row(Some("total"))).await {
                return ExecResult::err(1, format!("wc: {err}"));
            }
        }

        ExecResult::ok()
    }
}
