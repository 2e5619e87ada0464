//! Error types for mcpi

use thiserror::Error;

/// Result type for mcpi operations
pub type Result<T> = std::result::Result<T, McpiError>;

/// mcpi error types
#[derive(Debug, Error)]
pub enum McpiError {
    /// Could not establish the stream
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid client configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Read or write failure on an open stream
    #[error("IO error: {0}")]
    Io(String),

    /// Command issued after the connection was closed
    #[error("Not connected")]
    NotConnected,

    /// Connection went away while a response was pending
    #[error("Connection closed before a response arrived")]
    ConnectionClosed,

    /// Response did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Block name missing from the block table
    #[error("Unknown block: {0}")]
    UnknownBlock(String),

    /// Color name missing from the color table
    #[error("Unknown color: {0}")]
    UnknownColor(String),
}

impl From<std::io::Error> for McpiError {
    fn from(err: std::io::Error) -> Self {
        McpiError::Io(err.to_string())
    }
}
