//! High-level orchestrator: resolve → connect → read loop → summary.

use crate::{
    cli::Args,
    error::{ProbeError, Result},
    formatter::{self, Formatter},
    probe::{self, read_sample},
    stats::{ConnectInfo, Outcome, Stats, Summary},
};
use std::{
    io::{self, Write},
    time::Instant,
};
use tokio::{io::AsyncRead, signal};
use tracing::{debug, error, info, warn};

pub fn run(args: Args) -> Result<i32> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_async(args))
}

async fn run_async(args: Args) -> Result<i32> {
    let fmt: Box<dyn Formatter> = formatter::from_mode(args.output_mode, args.mode);
    let mut out = io::stdout().lock();
    let summary = run_with(&args, fmt.as_ref(), &mut out, signal::ctrl_c()).await?;
    Ok(summary.exit_code())
}

/// Run one complete session, stopping early when `shutdown` resolves.
///
/// Connection failures are returned as `Err` before any sample is read.
/// Everything that ends the read loop is recorded in the returned
/// [`Summary`] instead.
pub async fn run_with<S>(
    args: &Args,
    fmt: &dyn Formatter,
    out: &mut dyn Write,
    shutdown: S,
) -> Result<Summary>
where
    S: Future,
{
    /* resolve + connect */
    let addrs = probe::resolve(&args.address, args.port)?;
    debug!(candidates = ?addrs, "resolved {}:{}", args.address, args.port);

    let t0 = Instant::now();
    let (mut stream, addr) = probe::connect(&addrs, args.connect_timeout()).await?;
    let connect_ms = t0.elapsed().as_secs_f64() * 1_000.0;
    info!(%addr, connect_ms, "connected");

    let info = ConnectInfo {
        addr,
        connect_time_ms: connect_ms,
        format: args.sample_format().to_string(),
    };

    /* main loop */
    let mut stats = Stats::new(addr, connect_ms);
    let outcome = match fmt.connected(out, &info) {
        Ok(()) => read_loop(&mut stream, &mut stats, fmt, out, args, shutdown).await,
        Err(e) => output_closed(&e),
    };
    drop(stream);

    let summary = stats.summary(outcome);
    if let Err(e) = fmt.summary(out, &summary) {
        debug!(error = %e, "summary not written");
    }
    Ok(summary)
}

fn output_closed(e: &io::Error) -> Outcome {
    info!(error = %e, "output closed, stopping");
    Outcome::OutputClosed
}

/// Pull samples off `reader` until the limit, a read or write failure, or
/// `shutdown`.
pub async fn read_loop<R, S>(
    reader: &mut R,
    stats: &mut Stats,
    fmt: &dyn Formatter,
    out: &mut dyn Write,
    args: &Args,
    shutdown: S,
) -> Outcome
where
    R: AsyncRead + Unpin,
    S: Future,
{
    let format = args.sample_format();
    let read_timeout = args.read_timeout();
    tokio::pin!(shutdown);

    loop {
        if stats.limit_reached(args.count) {
            info!(samples = stats.received(), "sample limit reached");
            return Outcome::LimitReached;
        }

        tokio::select! {
            res = read_sample(&mut *reader, format, read_timeout) => match res {
                Ok(sample) => {
                    let rec = stats.feed(sample.value, sample.wait_ms);
                    debug!(seq = rec.seq, value = rec.value, wait_ms = rec.wait_ms, "sample");
                    if let Err(e) = fmt.sample(out, &rec) {
                        return output_closed(&e);
                    }
                }
                Err(ProbeError::PeerClosed) => {
                    warn!(samples = stats.received(), "connection closed by peer");
                    return Outcome::PeerClosed;
                }
                Err(e) => {
                    error!(error = %e, "failed to read from socket");
                    return Outcome::Failed(e.to_string());
                }
            },
            _ = &mut shutdown => {
                info!(samples = stats.received(), "interrupted");
                return Outcome::Interrupted;
            }
        }
    }
}
