//! Transport abstractions
//!
//! Provides AsyncReader/AsyncWriter traits so the correlator does not care
//! whether inbound events are raw chunks or whole lines.

use async_trait::async_trait;
use mcpi_core::Result;

/// Trait for async reading of inbound events
#[async_trait]
pub trait AsyncReader: Send {
    /// Read the next inbound event.
    ///
    /// `Ok(None)` means the remote end closed the stream. Must be cancel
    /// safe: the correlator polls it inside `select!`.
    async fn read_event(&mut self) -> Result<Option<String>>;
}

/// Trait for async writing of command lines
#[async_trait]
pub trait AsyncWriter: Send {
    /// Write `line` followed by a newline.
    async fn write_line(&mut self, line: &str) -> Result<()>;
}
