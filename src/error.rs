//! Error types for osilink.

use thiserror::Error;

/// Failure while moving a single frame across a byte stream.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Peer closed the stream cleanly before any byte of a new frame.
    #[error("connection closed")]
    ConnectionClosed,

    /// Truncated header or body.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Declared (or outgoing) length does not fit the buffer bound.
    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    TooLarge { len: usize, max: usize },

    /// Write failure or header read failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one request/response exchange (client command or server reply).
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("transport: {0}")]
    Frame(#[from] FrameError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot connect to server: {0}")]
    Connect(std::io::Error),
}

/// Result alias for frame-level operations.
pub type Result<T> = std::result::Result<T, FrameError>;
