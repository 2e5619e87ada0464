//! Connection handle
//!
//! Owns one stream to the world. Commands are written through the write
//! half; the read half belongs to the correlator's reader task.

use crate::config::{ClientConfig, Framing};
use crate::correlator::{Control, EventCallback, ReplyCallback, Sink, Waiter, reader_task};
use crate::stream::{ChunkReader, LineReader, StreamWriter};
use crate::transport::AsyncWriter;
use mcpi_core::{McpiError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// State shared between the handle and its reader task
pub(crate) struct Shared {
    writer: Mutex<Option<Box<dyn AsyncWriter>>>,
    closed: watch::Sender<bool>,
}

impl Shared {
    /// Mark the connection closed and drop the write half.
    ///
    /// Never waits on the writer lock. A `send` holding it sees the closed
    /// flag, abandons its write and drops the writer itself.
    pub(crate) fn shutdown(&self) {
        self.closed.send_replace(true);
        if let Ok(mut writer) = self.writer.try_lock() {
            writer.take();
        }
    }
}

/// A live connection to the world
pub struct Connection {
    shared: Arc<Shared>,
    control_tx: mpsc::UnboundedSender<Control>,
    next_listener_id: AtomicU64,
    reader_handle: JoinHandle<()>,
}

impl Connection {
    /// Open a TCP connection to `config.host:config.port`.
    ///
    /// Resolves once the stream is established. No retry is attempted.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let address = config.address();
        info!("Connecting to world at {}", address);

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| McpiError::Connection(format!("timed out connecting to {}", address)))?
            .map_err(|e| McpiError::Connection(format!("connect to {} failed: {}", address, e)))?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("set_nodelay failed: {}", e);
        }

        let (read_half, write_half) = stream.into_split();
        info!("Connected to server");
        Ok(Self::from_halves(read_half, write_half, config.framing))
    }

    /// Attach to an already-open byte stream. Must be called inside a tokio runtime.
    pub fn from_stream<S>(stream: S, framing: Framing) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        Self::from_halves(read_half, write_half, framing)
    }

    fn from_halves<R, W>(read_half: R, write_half: W, framing: Framing) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (closed, _) = watch::channel(false);
        let writer: Box<dyn AsyncWriter> = Box::new(StreamWriter(write_half));
        let shared = Arc::new(Shared {
            writer: Mutex::new(Some(writer)),
            closed,
        });
        let (control_tx, control_rx) = mpsc::unbounded_channel();

        let task_shared = shared.clone();
        let reader_handle = match framing {
            Framing::Chunk => tokio::spawn(reader_task(
                ChunkReader::new(read_half),
                framing,
                control_rx,
                task_shared,
            )),
            Framing::Line => tokio::spawn(reader_task(
                LineReader::new(read_half),
                framing,
                control_rx,
                task_shared,
            )),
        };

        Self {
            shared,
            control_tx,
            next_listener_id: AtomicU64::new(1),
            reader_handle,
        }
    }

    /// Write `line` plus a newline. Does not wait for any reply.
    ///
    /// A write stalled on a peer that stopped reading is abandoned as soon
    /// as the connection closes, returning [`McpiError::NotConnected`].
    pub async fn send(&self, line: &str) -> Result<()> {
        let mut closed = self.shared.closed.subscribe();
        let mut guard = self.shared.writer.lock().await;
        let writer = guard.as_mut().ok_or(McpiError::NotConnected)?;
        debug!("[Rust→World] {}", line);

        let written = tokio::select! {
            biased;

            _ = closed.wait_for(|closed| *closed) => None,
            result = writer.write_line(line) => Some(result),
        };
        match written {
            Some(result) => result,
            None => {
                guard.take();
                Err(McpiError::NotConnected)
            }
        }
    }

    /// Send `line` and resolve with the next inbound event.
    ///
    /// There is no timeout. If the connection closes first this returns
    /// [`McpiError::ConnectionClosed`].
    pub async fn request(&self, line: &str) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.control(Control::Await(Waiter::Reply(tx)))?;
        self.send(line).await?;
        rx.await.map_err(|_| McpiError::ConnectionClosed)
    }

    /// Send `line` and run `callback` with the next inbound event.
    ///
    /// Without a callback the request is terminal: the connection is closed
    /// once that event arrives.
    pub async fn send_receive(&self, line: &str, callback: Option<ReplyCallback>) -> Result<()> {
        let waiter = match callback {
            Some(callback) => Waiter::Callback(callback),
            None => Waiter::Close,
        };
        self.control(Control::Await(waiter))?;
        self.send(line).await
    }

    /// Send `line` once and run `callback` on every inbound event.
    ///
    /// Without a callback the first event is logged and the connection is
    /// closed. Callbacks run on the reader task and must not block.
    pub async fn add_listener(
        &self,
        line: &str,
        callback: Option<EventCallback>,
    ) -> Result<ListenerHandle> {
        let sink = match callback {
            Some(callback) => Sink::Callback(callback),
            None => Sink::LogAndClose,
        };
        let id = self.listen(sink)?;
        self.send(line).await?;
        Ok(ListenerHandle {
            id,
            control_tx: self.control_tx.clone(),
        })
    }

    /// Send `line` once and stream every inbound event to the returned
    /// [`Subscription`]. Dropping it stops delivery.
    pub async fn subscribe(&self, line: &str) -> Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listen(Sink::Channel(tx))?;
        self.send(line).await?;
        Ok(Subscription { rx })
    }

    /// Tear the connection down immediately.
    ///
    /// Pending requests fail with [`McpiError::ConnectionClosed`]; listeners
    /// stop. Buffered output is not flushed and an in-flight `send` is
    /// abandoned. Closing twice is harmless.
    pub fn close(&self) {
        self.shared.shutdown();
        self.reader_handle.abort();
        debug!("Connection closed");
    }

    pub fn is_closed(&self) -> bool {
        *self.shared.closed.borrow()
    }

    /// Resolves once the connection is closed, by either side.
    pub async fn closed(&self) {
        let mut rx = self.shared.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }

    fn control(&self, control: Control) -> Result<()> {
        self.control_tx
            .send(control)
            .map_err(|_| McpiError::NotConnected)
    }

    fn listen(&self, sink: Sink) -> Result<u64> {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.control(Control::Listen(id, sink))?;
        Ok(id)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader_handle.abort();
    }
}

/// Handle to a callback listener registered with [`Connection::add_listener`]
pub struct ListenerHandle {
    id: u64,
    control_tx: mpsc::UnboundedSender<Control>,
}

impl ListenerHandle {
    /// Stop invoking the callback. The command is not retracted server side.
    pub fn cancel(self) {
        let _ = self.control_tx.send(Control::Unlisten(self.id));
    }
}

/// Stream of inbound events from [`Connection::subscribe`]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<String>,
}

impl Subscription {
    /// Next event, or `None` once the connection is closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_close_abandons_stalled_write() {
        // The peer never reads, so a write larger than the pipe blocks.
        let (client, _world) = tokio::io::duplex(8);
        let conn = Connection::from_stream(client, Framing::Chunk);
        let line = "x".repeat(1024);

        let (sent, ()) = timeout(Duration::from_secs(2), async {
            tokio::join!(conn.send(&line), async {
                sleep(Duration::from_millis(50)).await;
                conn.close();
            })
        })
        .await
        .expect("close waited on the stalled write");

        assert!(matches!(sent, Err(McpiError::NotConnected)));
        assert!(conn.is_closed());
        assert!(matches!(conn.send("chat.post(x)").await, Err(McpiError::NotConnected)));
    }

    #[tokio::test]
    async fn test_close_twice() {
        let (client, _world) = tokio::io::duplex(64);
        let conn = Connection::from_stream(client, Framing::Line);

        conn.close();
        conn.close();
        assert!(conn.is_closed());
        timeout(Duration::from_secs(2), conn.closed()).await.unwrap();
    }
}
