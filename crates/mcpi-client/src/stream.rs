//! Stream transport implementations
//!
//! Wraps any tokio byte stream half. TCP is the usual case; tests use
//! in-memory duplex pipes.

use crate::transport::{AsyncReader, AsyncWriter};
use async_trait::async_trait;
use mcpi_core::{McpiError, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

const CHUNK_SIZE: usize = 4096;

/// Yields whatever a single read returns.
///
/// A chunk may hold half a response, or the tail of one response and the
/// head of the next. Nothing is buffered across reads.
pub struct ChunkReader<R> {
    inner: R,
    buf: Box<[u8]>,
}

impl<R> ChunkReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AsyncReader for ChunkReader<R> {
    async fn read_event(&mut self) -> Result<Option<String>> {
        let n = self
            .inner
            .read(&mut self.buf)
            .await
            .map_err(|e| McpiError::Io(format!("read failed: {}", e)))?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf[..n]).into_owned()))
    }
}

/// Yields one newline-terminated line per event, terminator stripped.
pub struct LineReader<R> {
    inner: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: AsyncRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: Vec::new(),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AsyncReader for LineReader<R> {
    async fn read_event(&mut self) -> Result<Option<String>> {
        // Partial reads stay in `pending` if this future is dropped.
        let n = self
            .inner
            .read_until(b'\n', &mut self.pending)
            .await
            .map_err(|e| McpiError::Io(format!("read failed: {}", e)))?;
        if n == 0 && self.pending.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.pending);
        let text = String::from_utf8_lossy(&line);
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Write half wrapper
pub struct StreamWriter<W>(pub W);

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> AsyncWriter for StreamWriter<W> {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');

        self.0
            .write_all(&data)
            .await
            .map_err(|e| McpiError::Io(format!("write failed: {}", e)))?;

        // Flush to ensure data is sent
        self.0
            .flush()
            .await
            .map_err(|e| McpiError::Io(format!("flush failed: {}", e)))?;

        Ok(())
    }
}
