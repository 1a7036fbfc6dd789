//! Error types for Ripple
//!
//! Library-level failures only. Command failures never surface here: per the
//! [`Command`](crate::commands::Command) contract they are converted into an
//! [`ExecResult`](crate::ExecResult) exit code inside the stage that hit them.

use thiserror::Error;

/// Result type alias using Ripple's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Ripple error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Syntax error while lexing or parsing a line, with the byte offset of
    /// the offending character.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },

    /// Write attempted on a closed channel. A contract violation by the
    /// producer stage; fatal to that stage only.
    #[error("channel is closed")]
    ChannelClosed,

    /// I/O error from endpoint channels or file access.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a syntax error at the given byte offset.
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            offset,
        }
    }
}
