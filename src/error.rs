//! Common error wrapper.

use std::{net::SocketAddr, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("can't resolve server address {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("can't create socket for {addr}: {source}")]
    SocketCreate {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("can't connect to server {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("connecting to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: SocketAddr, timeout: Duration },

    #[error("failed to read from socket: {0}")]
    Read(#[source] std::io::Error),

    #[error("no sample arrived within {0:?}")]
    ReadTimeout(Duration),

    #[error("connection closed by peer")]
    PeerClosed,

    #[error("connection closed mid-sample ({got} of {want} bytes)")]
    Truncated { got: usize, want: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Handy alias.
pub type Result<T> = std::result::Result<T, ProbeError>;
