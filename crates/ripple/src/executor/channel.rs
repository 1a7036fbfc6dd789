//! Byte-stream channels connecting pipeline stages
//!
//! A [`Channel`] is a single-producer/single-consumer mailbox with POSIX-pipe
//! flavored semantics: writes append and never block, reads take the whole
//! buffer and suspend until data arrives or the producer closes. The head and
//! tail of a pipeline use the [`StdinChannel`]/[`StdoutChannel`] endpoints
//! instead, which bridge to the process's standard streams.
//!
//! End-of-stream is `read()` returning an empty string *while the channel is
//! closed*. Consumers must test both: an empty read alone is not EOF, and a
//! close with data still buffered drains that data before signaling EOF.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Notify;

use crate::error::{Error, Result};

/// Readable side of a stage connection.
#[async_trait]
pub trait InputChannel: Send + Sync {
    /// Take everything currently buffered, waiting for data or close.
    /// Returns an empty string only at end of stream (see module docs).
    async fn read(&self) -> String;

    /// Whether the producer side has closed.
    fn is_closed(&self) -> bool;

    /// Release the reader side. Idempotent.
    fn close(&self);
}

/// Writable side of a stage connection.
#[async_trait]
pub trait OutputChannel: Send + Sync {
    /// Append `data` for the consumer. Never blocks; fails with
    /// [`Error::ChannelClosed`] once the channel is closed.
    async fn write(&self, data: &str) -> Result<()>;

    /// Signal end of stream to the consumer. Idempotent.
    fn close(&self);
}

#[derive(Default)]
struct ChannelState {
    buffer: String,
    closed: bool,
}

/// In-memory channel between two adjacent stages.
///
/// One producer and one consumer are assumed; writes from a single producer
/// serialize on the internal mutex and are observed in that order.
#[derive(Default)]
pub struct Channel {
    state: Mutex<ChannelState>,
    notify: Notify,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_inner(&self) {
        self.state.lock().unwrap().closed = true;
        // A permit, not just a wakeup: the single consumer may not have
        // registered yet when close races with its pre-await state check.
        self.notify.notify_one();
    }
}

#[async_trait]
impl OutputChannel for Channel {
    async fn write(&self, data: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(Error::ChannelClosed);
            }
            state.buffer.push_str(data);
        }
        self.notify.notify_one();
        Ok(())
    }

    fn close(&self) {
        self.close_inner();
    }
}

#[async_trait]
impl InputChannel for Channel {
    async fn read(&self) -> String {
        loop {
            let notified = self.notify.notified();
            {
                let mut state = self.state.lock().unwrap();
                if !state.buffer.is_empty() {
                    return std::mem::take(&mut state.buffer);
                }
                if state.closed {
                    return String::new();
                }
            }
            notified.await;
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn close(&self) {
        self.close_inner();
    }
}

/// Pipeline head endpoint: reads lines from process standard input.
pub struct StdinChannel {
    reader: tokio::sync::Mutex<BufReader<tokio::io::Stdin>>,
    eof: AtomicBool,
}

impl StdinChannel {
    pub fn new() -> Self {
        Self {
            reader: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
            eof: AtomicBool::new(false),
        }
    }
}

impl Default for StdinChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputChannel for StdinChannel {
    /// One line per read, trailing newline included.
    async fn read(&self) -> String {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                self.eof.store(true, Ordering::SeqCst);
                String::new()
            }
            Ok(_) => {
                if !line.ends_with('\n') {
                    line.push('\n');
                }
                line
            }
            Err(err) => {
                tracing::warn!(%err, "stdin read failed");
                self.eof.store(true, Ordering::SeqCst);
                String::new()
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.eof.load(Ordering::SeqCst)
    }

    // Standard input belongs to the process, not the pipeline.
    fn close(&self) {}
}

/// Pipeline tail endpoint: writes pass straight through to standard output.
pub struct StdoutChannel {
    writer: tokio::sync::Mutex<tokio::io::Stdout>,
}

impl StdoutChannel {
    pub fn new() -> Self {
        Self {
            writer: tokio::sync::Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for StdoutChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputChannel for StdoutChannel {
    async fn write(&self, data: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(data.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    // Standard output stays open across pipelines.
    fn close(&self) {}
}
