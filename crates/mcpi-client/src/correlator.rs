//! Response correlator
//!
//! The world never tags its replies, so a reply is simply "the next inbound
//! event". A background reader task owns the read half and hands each event
//! to whoever is waiting for it:
//! - one-shot waiters registered by `request`/`send_receive`
//! - persistent listeners registered by `add_listener`/`subscribe`

use crate::config::Framing;
use crate::connection::Shared;
use crate::transport::AsyncReader;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// Runs once with the next inbound event.
pub type ReplyCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Runs with every inbound event until cancelled.
pub type EventCallback = Box<dyn FnMut(String) + Send + 'static>;

/// A one-shot waiter
pub(crate) enum Waiter {
    /// Resolve a future
    Reply(oneshot::Sender<String>),
    /// Run a caller callback
    Callback(ReplyCallback),
    /// No handler: the exchange is terminal, close the connection
    Close,
}

/// A persistent listener
pub(crate) enum Sink {
    Channel(mpsc::UnboundedSender<String>),
    Callback(EventCallback),
    /// No handler: log the first event and close the connection
    LogAndClose,
}

/// Messages from the connection handle to the reader task
pub(crate) enum Control {
    Await(Waiter),
    Listen(u64, Sink),
    Unlisten(u64),
}

/// Dispatch state owned by the reader task
pub(crate) struct Dispatcher {
    framing: Framing,
    waiters: VecDeque<Waiter>,
    sinks: Vec<(u64, Sink)>,
}

impl Dispatcher {
    pub(crate) fn new(framing: Framing) -> Self {
        Self {
            framing,
            waiters: VecDeque::new(),
            sinks: Vec::new(),
        }
    }

    pub(crate) fn apply(&mut self, control: Control) {
        match control {
            Control::Await(waiter) => self.waiters.push_back(waiter),
            Control::Listen(id, sink) => self.sinks.push((id, sink)),
            Control::Unlisten(id) => self.sinks.retain(|(sink_id, _)| *sink_id != id),
        }
    }

    /// Deliver one event. Returns true when a handler asked for the
    /// connection to be closed.
    pub(crate) fn dispatch(&mut self, payload: &str) -> bool {
        let mut close = false;

        // Chunk framing: every waiter pending now sees this event.
        // Line framing: one line answers the oldest waiter.
        let take = match self.framing {
            Framing::Chunk => self.waiters.len(),
            Framing::Line => self.waiters.len().min(1),
        };
        for waiter in self.waiters.drain(..take) {
            match waiter {
                Waiter::Reply(tx) => {
                    if tx.send(payload.to_string()).is_err() {
                        debug!("Reply dropped, requester went away");
                    }
                }
                Waiter::Callback(callback) => callback(payload.to_string()),
                Waiter::Close => close = true,
            }
        }

        self.sinks.retain_mut(|(id, sink)| match sink {
            Sink::Channel(tx) => {
                let alive = tx.send(payload.to_string()).is_ok();
                if !alive {
                    debug!("Subscription {} dropped", id);
                }
                alive
            }
            Sink::Callback(callback) => {
                callback(payload.to_string());
                true
            }
            Sink::LogAndClose => {
                info!("{}", payload);
                close = true;
                true
            }
        });

        close
    }

    pub(crate) fn pending(&self) -> usize {
        self.waiters.len()
    }

    pub(crate) fn listeners(&self) -> usize {
        self.sinks.len()
    }
}

/// Background reader task that correlates inbound events
///
/// Control messages are always drained before the socket is polled, and
/// callers queue their waiter before writing the command, so an event can
/// never arrive ahead of the waiter it belongs to.
pub(crate) async fn reader_task<R: AsyncReader>(
    mut reader: R,
    framing: Framing,
    mut control_rx: mpsc::UnboundedReceiver<Control>,
    shared: Arc<Shared>,
) {
    let mut dispatcher = Dispatcher::new(framing);

    loop {
        tokio::select! {
            biased;

            control = control_rx.recv() => {
                match control {
                    Some(control) => dispatcher.apply(control),
                    None => {
                        debug!("Control channel closed, reader task exiting");
                        break;
                    }
                }
            }

            event = reader.read_event() => {
                match event {
                    Ok(Some(payload)) => {
                        debug!("[World→Rust] {:?}", payload);
                        if dispatcher.dispatch(&payload) {
                            debug!("Terminal response received, closing connection");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Server disconnected");
                        break;
                    }
                    Err(e) => {
                        error!("Reader task failed: {}", e);
                        break;
                    }
                }
            }
        }
    }

    if dispatcher.pending() > 0 || dispatcher.listeners() > 0 {
        debug!(
            "Dropping {} pending request(s) and {} listener(s)",
            dispatcher.pending(),
            dispatcher.listeners()
        );
    }
    drop(dispatcher);
    shared.shutdown();
}
