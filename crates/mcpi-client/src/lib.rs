//! Async client for the mcpi remote world protocol
//!
//! This crate provides:
//! - A connection handle over TCP (or any tokio byte stream)
//! - Transport abstractions (AsyncReader/AsyncWriter traits)
//! - A background reader task correlating replies with requests
//! - The typed [`Minecraft`] client

pub mod client;
pub mod config;
pub mod connection;
mod correlator;
pub mod stream;
pub mod transport;

pub use client::Minecraft;
pub use config::{ClientConfig, DEFAULT_PORT, Framing};
pub use connection::{Connection, ListenerHandle, Subscription};
pub use correlator::{EventCallback, ReplyCallback};
pub use transport::{AsyncReader, AsyncWriter};
