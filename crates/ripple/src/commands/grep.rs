//! grep builtin command
//!
//! Supports `-w` (whole words), `-i` (ignore case) and `-A n` (n lines of
//! trailing context). Reads standard input when no files are given.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use super::{drain, Command, Context};
use crate::error::Result;
use crate::executor::channel::OutputChannel;
use crate::executor::ExecResult;

/// The grep builtin.
pub struct Grep;

struct GrepArgs {
    word: bool,
    ignore_case: bool,
    after: usize,
    pattern: String,
    files: Vec<String>,
}

impl GrepArgs {
    fn parse(args: &[String]) -> std::result::Result<Self, String> {
        let mut word = false;
        let mut ignore_case = false;
        let mut after = 0usize;
        let mut positional = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-w" => word = true,
                "-i" => ignore_case = true,
                "-A" => {
                    let count = iter.next().ok_or("option -A requires a count")?;
                    after = count
                        .parse()
                        .map_err(|_| format!("invalid context count: {count}"))?;
                }
                _ => positional.push(arg.clone()),
            }
        }

        let mut positional = positional.into_iter();
        let pattern = positional.next().ok_or("missing pattern")?;
        Ok(Self {
            word,
            ignore_case,
            after,
            pattern,
            files: positional.collect(),
        })
    }

    fn build_regex(&self) -> std::result::Result<Regex, regex::Error> {
        let pattern = if self.word {
            format!(r"\b({})\b", self.pattern)
        } else {
            self.pattern.clone()
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
    }
}

/// Write matching lines plus trailing context to `output`.
async fn grep_content(
    content: &str,
    re: &Regex,
    after: usize,
    output: &dyn OutputChannel,
) -> Result<()> {
    let mut pending_context = 0usize;

    for line in content.lines() {
        let matched = re.is_match(line);
        if matched {
            pending_context = after;
        } else if pending_context > 0 {
            pending_context -= 1;
        } else {
            continue;
        }
        output.write(line).await?;
        output.write("\n").await?;
    }
    Ok(())
}

#[async_trait]
impl Command for Grep {
    async fn execute(&self, ctx: Context) -> ExecResult {
        let args = match GrepArgs::parse(&ctx.args) {
            Ok(args) => args,
            Err(message) => return ExecResult::err(2, format!("grep: {message}")),
        };
        let re = match args.build_regex() {
            Ok(re) => re,
            Err(err) => return ExecResult::err(2, format!("grep: invalid pattern: {err}")),
        };

        if args.files.is_empty() {
            let content = drain(ctx.input.as_ref()).await;
            return match grep_content(&content, &re, args.after, ctx.output.as_ref()).await {
                Ok(()) => ExecResult::ok(),
                Err(err) => ExecResult::err(1, format!("grep: {err}")),
            };
        }

        let mut any_readable = false;
        for file in &args.files {
            let content = match tokio::fs::read_to_string(file).await {
                Ok(content) => content,
                Err(err) => {
                    tracing::debug!(%file, %err, "grep: skipping unreadable file");
                    continue;
                }
            };
            any_readable = true;
            if let Err(err) = grep_content(&content, &re, args.after, ctx.output.as_ref()).await {
                return ExecResult::err(1, format!("grep: {err}"));
            }
        }

        if !any_readable {
            return ExecResult::err(1, "grep: no such file or directory");
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
    async fn matches_lines_from_stdin() {
        let (ctx, input, output) = context(&["needle"]);
        feed(&input, "hay\nneedle here\nmore hay\n").await;
        let result = Grep.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(collect(&output).await, "needle here\n");
    }

    #[tokio::test]
    async fn no_match_is_still_success() {
        let (ctx, input, output) = context(&["absent"]);
        feed(&input, "nothing to see\n").await;
        let result = Grep.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(collect(&output).await, "");
    }

    #[tokio::test]
    async fn ignore_case_flag() {
        let (ctx, input, output) = context(&["-i", "HELLO"]);
        feed(&input, "hello world\nbye\n").await;
        Grep.execute(ctx).await;
        assert_eq!(collect(&output).await, "hello world\n");
    }

    #[tokio::test]
    async fn word_flag_requires_word_boundaries() {
        let (ctx, input, output) = context(&["-w", "cat"]);
        feed(&input, "cat\nconcatenate\nthe cat sat\n").await;
        Grep.execute(ctx).await;
        assert_eq!(collect(&output).await, "cat\nthe cat sat\n");
    }

    #[tokio::test]
    async fn after_context_prints_following_lines() {
        let (ctx, input, output) = context(&["-A", "1", "hit"]);
        feed(&input, "hit\nctx\nskip\nhit\ntail\n").await;
        Grep.execute(ctx).await;
        assert_eq!(collect(&output).await, "hit\nctx\nhit\ntail\n");
    }

    #[tokio::test]
    async fn reads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "alpha\nbeta\n").unwrap();
        let (ctx, _, output) = context(&["beta", f.path().to_str().unwrap()]);
        let result = Grep.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(collect(&output).await, "beta\n");
    }

    #[tokio::test]
    async fn missing_files_only_is_exit_one() {
        let (ctx, _, _) = context(&["pat", "/no/such/file"]);
        let result = Grep.execute(ctx).await;
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn one_readable_file_among_missing_is_ok() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "pat\n").unwrap();
        let (ctx, _, output) = context(&["pat", "/no/such/file", f.path().to_str().unwrap()]);
        let result = Grep.execute(ctx).await;
        assert_eq!(result, ExecResult::ok());
        assert_eq!(collect(&output).await, "pat\n");
    }

    #[tokio::test]
    async fn missing_pattern_is_usage_error() {
        let (ctx, _, _) = context(&[]);
        let result = Grep.execute(ctx).await;
        assert_eq!(result.exit_code, 2);
    }

    #[tokio::test]
    async fn invalid_regex_is_usage_error() {
        let (ctx, input, _) = context(&["("]);
        feed(&input, "").await;
        let result = Grep.execute(ctx).await;
        assert_eq!(result.exit_code, 2);
    }
}
