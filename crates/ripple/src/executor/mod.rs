//! Concurrent pipeline executor
//!
//! Wires N stages together with N-1 in-memory channels plus the caller's
//! stdin/stdout endpoints, runs every stage on its own tokio task, and
//! aggregates one result per pipeline with first-failure-wins semantics.

pub mod channel;
pub mod registry;

pub use channel::{Channel, InputChannel, OutputChannel, StdinChannel, StdoutChannel};
pub use registry::Registry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;

use crate::commands::Context;
use crate::env::Environment;
use crate::expand::expand_token;
use crate::parser::CommandNode;

/// Aggregate outcome of one processed line (or of a single stage).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code; zero means success.
    pub exit_code: i32,
    /// Whether the shell session should terminate (the `exit` builtin).
    pub should_exit: bool,
    /// Human-readable failure message, if any.
    pub error: Option<String>,
}

impl ExecResult {
    /// Successful result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Failed result with an exit code and message.
    pub fn err(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            should_exit: false,
            error: Some(message.into()),
        }
    }

    /// Session-terminating result (`exit`).
    pub fn exit(exit_code: i32) -> Self {
        Self {
            exit_code,
            should_exit: true,
            error: None,
        }
    }

    fn is_failure(&self) -> bool {
        self.exit_code != 0 || self.should_exit
    }
}

/// Shared per-pipeline cancellation state.
///
/// `stop` flips false-to-true exactly once; the stage that wins the exchange
/// owns the aggregate outcome. Later failures do not overwrite it.
#[derive(Default)]
struct PipelineState {
    stop: AtomicBool,
    outcome: Mutex<Option<ExecResult>>,
}

/// Execute an ordered command chain as concurrently running stages.
///
/// Stage `i` reads stage `i-1`'s channel (or `stdin` for the head) and
/// writes the next internal channel (or `stdout` for the tail). All stages
/// start before any is awaited, so a consumer can drain while its producer
/// is still running, matching POSIX pipes.
pub async fn run_pipeline(
    commands: &[CommandNode],
    env: Arc<Environment>,
    registry: Arc<Registry>,
    stdin: Arc<dyn InputChannel>,
    stdout: Arc<dyn OutputChannel>,
) -> ExecResult {
    if commands.is_empty() {
        return ExecResult::ok();
    }

    let n = commands.len();
    let state = Arc::new(PipelineState::default());

    let mut inputs: Vec<Arc<dyn InputChannel>> = Vec::with_capacity(n);
    let mut outputs: Vec<Arc<dyn OutputChannel>> = Vec::with_capacity(n);
    inputs.push(stdin);
    for _ in 1..n {
        let link = Arc::new(Channel::new());
        outputs.push(Arc::clone(&link) as Arc<dyn OutputChannel>);
        inputs.push(link);
    }
    outputs.push(stdout);

    tracing::debug!(stages = n, "pipeline start");

    let handles: Vec<_> = commands
        .iter()
        .zip(inputs.into_iter().zip(outputs))
        .map(|(node, (input, output))| {
            let node = node.clone();
            let env = Arc::clone(&env);
            let registry = Arc::clone(&registry);
            let state = Arc::clone(&state);
            tokio::spawn(run_stage(node, input, output, env, registry, state))
        })
        .collect();

    for handle in handles {
        // A stage task only aborts if run_stage itself panics; command
        // panics are contained below.
        let _ = handle.await;
    }

    let result = state
        .outcome
        .lock()
        .unwrap()
        .take()
        .unwrap_or_default();
    tracing::debug!(exit_code = result.exit_code, "pipeline done");
    result
}

async fn run_stage(
    node: CommandNode,
    input: Arc<dyn InputChannel>,
    output: Arc<dyn OutputChannel>,
    env: Arc<Environment>,
    registry: Arc<Registry>,
    state: Arc<PipelineState>,
) {
    // Cancellation is cooperative and checked only here: a handler that has
    // already started runs to completion.
    if state.stop.load(Ordering::SeqCst) {
        output.close();
        return;
    }

    let name = expand_token(&node.name, &env);
    let args: Vec<String> = node
        .args
        .iter()
        .map(|arg| expand_token(arg, &env))
        .collect();
    let handler = registry.get(&name);
    tracing::debug!(%name, "stage dispatch");

    let ctx = Context {
        name,
        args,
        input,
        output: Arc::clone(&output),
        env,
    };
    let result = std::panic::AssertUnwindSafe(handler.execute(ctx))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| ExecResult::err(1, "command panicked"));

    // Always close the output, even after a failure: the downstream reader
    // would otherwise wait forever.
    output.close();

    if result.is_failure()
        && state
            .stop
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    {
        *state.outcome.lock().unwrap() = Some(result);
    }
}
