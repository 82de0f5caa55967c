//! Low-level asynchronous TCP utilities.
//!
//! [`resolve`] and [`connect`] establish the single connection a session
//! uses; [`read_sample`] pulls one fixed-width sample off it and measures
//! how long the caller waited. Reads await socket readiness, nothing here
//! spins.

use crate::{
    error::{ProbeError, Result},
    wire::{MAX_SAMPLE_BYTES, SampleFormat},
};
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::{TcpSocket, TcpStream},
    time::{Duration, Instant, timeout},
};
use tracing::debug;

/// One decoded sample and the time spent waiting for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub value: i64,
    pub wait_ms: f64,
}

/// Resolve `host:port` to every candidate address, in resolver order.
pub fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let resolve_err = |source| ProbeError::Resolve {
        host: host.to_owned(),
        port,
        source,
    };
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(resolve_err)?
        .collect();
    if addrs.is_empty() {
        return Err(resolve_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no addresses found",
        )));
    }
    Ok(addrs)
}

/// Open one stream connection to `addr`.
///
/// * `addr` – socket address to connect to
/// * `to`   – optional bound on the connection attempt
pub async fn connect_one(addr: SocketAddr, to: Option<Duration>) -> Result<TcpStream> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|source| ProbeError::SocketCreate { addr, source })?;

    let attempt = socket.connect(addr);
    let res = match to {
        Some(limit) => timeout(limit, attempt)
            .await
            .map_err(|_| ProbeError::ConnectTimeout {
                addr,
                timeout: limit,
            })?,
        None => attempt.await,
    };
    res.map_err(|source| ProbeError::Connect { addr, source })
}

/// Try each address in turn and keep the first connection that succeeds.
///
/// If every attempt fails, the last error is returned.
pub async fn connect(
    addrs: &[SocketAddr],
    to: Option<Duration>,
) -> Result<(TcpStream, SocketAddr)> {
    let mut last_err = None;
    for &addr in addrs {
        match connect_one(addr, to).await {
            Ok(stream) => return Ok((stream, addr)),
            Err(e) => {
                debug!(%addr, error = %e, "connection attempt failed");
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        ProbeError::Other(anyhow::anyhow!("no address to connect to"))
    }))
}

/// Read exactly one sample from `reader`.
///
/// A zero-byte read before the first byte of a sample means the peer closed
/// the connection ([`ProbeError::PeerClosed`]); one after a partial sample
/// is reported as [`ProbeError::Truncated`].
pub async fn read_sample<R>(
    reader: &mut R,
    format: SampleFormat,
    to: Option<Duration>,
) -> Result<Sample>
where
    R: AsyncRead + Unpin,
{
    let start = Instant::now();
    let res = match to {
        Some(limit) => timeout(limit, read_exact_sample(reader, format))
            .await
            .map_err(|_| ProbeError::ReadTimeout(limit))?,
        None => read_exact_sample(reader, format).await,
    };
    let wait_ms = start.elapsed().as_secs_f64() * 1_000.0;
    res.map(|value| Sample { value, wait_ms })
}

async fn read_exact_sample<R>(reader: &mut R, format: SampleFormat) -> Result<i64>
where
    R: AsyncRead + Unpin,
{
    let want = format.size();
    let mut buf = [0u8; MAX_SAMPLE_BYTES];
    let mut got = 0;
    while got < want {
        let n = reader
            .read(&mut buf[got..want])
            .await
            .map_err(ProbeError::Read)?;
        if n == 0 {
            return Err(if got == 0 {
                ProbeError::PeerClosed
            } else {
                ProbeError::Truncated { got, want }
            });
        }
        got += n;
    }
    format
        .decode(&buf[..want])
        .ok_or_else(|| ProbeError::Other(anyhow::anyhow!("sample buffer has wrong length")))
}
