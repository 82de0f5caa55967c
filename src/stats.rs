//! Runtime statistics and data structures.
//!
//! [Stats] accumulates per-sample results and emits a final [Summary].
//! Both [SampleRecord] and [Summary] are serde-serialisable so the
//! formatting layer can dump them directly.

use serde::Serialize;
use std::net::SocketAddr;

/// Emitted once the connection is up.
#[derive(Clone, Debug, Serialize)]
pub struct ConnectInfo {
    pub addr: SocketAddr,
    pub connect_time_ms: f64,
    pub format: String,
}

/// One received sample.
///
/// This structure may be serialised as JSON / CSV by the formatter layer.
#[derive(Clone, Debug, Serialize)]
pub struct SampleRecord {
    pub seq: u64,
    pub addr: SocketAddr,
    pub value: i64,
    pub wait_ms: f64,
}

/// Why the read loop stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// `--count` samples were received
    LimitReached,
    /// Ctrl-C
    Interrupted,
    /// Nothing is reading our output any more
    OutputClosed,
    /// The peer closed the connection between samples
    PeerClosed,
    /// Any other read failure
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::PeerClosed | Outcome::Failed(_))
    }
}

/// Roll-up of an entire session.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub addr: SocketAddr,
    pub samples: u64,
    pub min_wait_ms: f64,
    pub avg_wait_ms: f64,
    pub max_wait_ms: f64,
    pub connect_time_ms: f64,
    pub outcome: Outcome,
}

/// Mutable accumulator used during a session.
pub struct Stats {
    addr: SocketAddr,
    received: u64,
    total_wait: f64,
    min_wait: f64,
    max_wait: f64,
    connect_ms: f64,
}

impl Stats {
    /// Create a new accumulator.
    pub fn new(addr: SocketAddr, connect_ms: f64) -> Self {
        Self {
            addr,
            received: 0,
            total_wait: 0.0,
            min_wait: f64::MAX,
            max_wait: 0.0,
            connect_ms,
        }
    }

    /// Feed one sample and obtain a [SampleRecord] to hand to the formatter.
    pub fn feed(&mut self, value: i64, wait_ms: f64) -> SampleRecord {
        self.received += 1;
        self.total_wait += wait_ms;
        self.min_wait = self.min_wait.min(wait_ms);
        self.max_wait = self.max_wait.max(wait_ms);

        SampleRecord {
            seq: self.received,
            addr: self.addr,
            value,
            wait_ms,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Has `--count` been satisfied?
    pub fn limit_reached(&self, limit: Option<u64>) -> bool {
        limit.is_some_and(|n| self.received >= n)
    }

    /// Produce the final [Summary].
    pub fn summary(&self, outcome: Outcome) -> Summary {
        let any = self.received > 0;
        Summary {
            addr: self.addr,
            samples: self.received,
            min_wait_ms: if any { self.min_wait } else { 0.0 },
            avg_wait_ms: if any {
                self.total_wait / self.received as f64
            } else {
                0.0
            },
            max_wait_ms: if any { self.max_wait } else { 0.0 },
            connect_time_ms: self.connect_ms,
            outcome,
        }
    }
}

impl Summary {
    /// Map the session outcome to a conventional Unix exit code.
    pub fn exit_code(&self) -> i32 {
        if self.outcome.is_failure() { 1 } else { 0 }
    }
}
