//! Client configuration

use mcpi_core::{McpiError, Result};
use std::str::FromStr;
use std::time::Duration;

/// Default mcpi API port.
pub const DEFAULT_PORT: u16 = 4711;

/// How inbound bytes are cut into events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// One event per transport read. A response split across reads, or two
    /// responses in one read, is delivered as-is.
    #[default]
    Chunk,
    /// One event per newline-terminated line. One-shot requests are answered
    /// in the order they were issued.
    Line,
}

impl FromStr for Framing {
    type Err = McpiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chunk" => Ok(Framing::Chunk),
            "line" => Ok(Framing::Line),
            other => Err(McpiError::Config(format!("unknown framing: {}", other))),
        }
    }
}

/// Configuration for a world connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host to connect to (default: 127.0.0.1)
    pub host: String,
    /// API port (default: 4711)
    pub port: u16,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Inbound event framing
    pub framing: Framing,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(10),
            framing: Framing::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read `MCPI_HOST`, `MCPI_PORT` and `MCPI_FRAMING`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("MCPI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("MCPI_PORT") {
            config.port = port
                .parse()
                .map_err(|_| McpiError::Config(format!("invalid MCPI_PORT: {}", port)))?;
        }
        if let Some(framing) = lookup("MCPI_FRAMING") {
            config.framing = framing.parse()?;
        }
        Ok(config)
    }
}
