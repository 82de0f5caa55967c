//! Pluggable output layer.
//!
//! Every formatter writes to the sink it is handed and returns the write
//! result, so a closed stdout ends the session instead of panicking.

use crate::{
    cli::{Mode, OutputMode},
    stats::{ConnectInfo, Outcome, SampleRecord, Summary},
};
use serde::Serialize;
use std::{
    cell::Cell,
    io::{self, Write},
};

/// Print behaviour contract.
pub trait Formatter {
    fn connected(&self, out: &mut dyn Write, info: &ConnectInfo) -> io::Result<()>;
    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()>;
    fn summary(&self, out: &mut dyn Write, sum: &Summary) -> io::Result<()>;
}

fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::LimitReached => "sample limit reached".into(),
        Outcome::Interrupted => "interrupted".into(),
        Outcome::OutputClosed => "output closed".into(),
        Outcome::PeerClosed => "connection closed by peer".into(),
        Outcome::Failed(why) => format!("read failed: {why}"),
    }
}

/* ---------- Normal text ---------- */

pub struct Normal {
    mode: Mode,
}

impl Formatter for Normal {
    fn connected(&self, out: &mut dyn Write, info: &ConnectInfo) -> io::Result<()> {
        writeln!(
            out,
            "Connected to {} ... ({}, {:.4} ms)",
            info.addr, info.format, info.connect_time_ms
        )
    }

    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()> {
        match self.mode {
            Mode::Report => writeln!(out, "Client <- Server: {}", rec.value),
            Mode::Latency => writeln!(out, "Sample #{} after {:.4} ms", rec.seq, rec.wait_ms),
        }
    }

    fn summary(&self, out: &mut dyn Write, s: &Summary) -> io::Result<()> {
        writeln!(
            out,
            "\n--- {} tcprobe statistics ---
{} samples received, {}",
            s.addr,
            s.samples,
            outcome_text(&s.outcome)
        )?;
        if self.mode == Mode::Latency && s.samples > 0 {
            writeln!(
                out,
                "Wait min/avg/max = {:.4}/{:.4}/{:.4} ms",
                s.min_wait_ms, s.avg_wait_ms, s.max_wait_ms
            )?;
        }
        Ok(())
    }
}

/* ---------- JSON ---------- */

pub struct Json;

impl Json {
    fn emit<T: Serialize>(out: &mut dyn Write, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut *out, value)?;
        writeln!(out)
    }
}

impl Formatter for Json {
    fn connected(&self, out: &mut dyn Write, info: &ConnectInfo) -> io::Result<()> {
        Self::emit(out, info)
    }
    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()> {
        Self::emit(out, rec)
    }
    fn summary(&self, out: &mut dyn Write, s: &Summary) -> io::Result<()> {
        Self::emit(out, s)
    }
}

/* ---------- CSV ---------- */

pub struct Csv;
impl Formatter for Csv {
    fn connected(&self, out: &mut dyn Write, _info: &ConnectInfo) -> io::Result<()> {
        writeln!(out, "seq,address,value,wait_ms")
    }

    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()> {
        writeln!(out, "{},{},{},{:.4}", rec.seq, rec.addr, rec.value, rec.wait_ms)
    }

    fn summary(&self, out: &mut dyn Write, s: &Summary) -> io::Result<()> {
        writeln!(out, "address,samples,min,avg,max,connect,outcome")?;
        let outcome = match &s.outcome {
            Outcome::LimitReached => "limit_reached",
            Outcome::Interrupted => "interrupted",
            Outcome::OutputClosed => "output_closed",
            Outcome::PeerClosed => "peer_closed",
            Outcome::Failed(_) => "failed",
        };
        writeln!(
            out,
            "{},{},{:.4},{:.4},{:.4},{:.4},{}",
            s.addr,
            s.samples,
            s.min_wait_ms,
            s.avg_wait_ms,
            s.max_wait_ms,
            s.connect_time_ms,
            outcome
        )
    }
}

/* ---------- Markdown table ---------- */

pub struct Md {
    mode: Mode,
    header_done: Cell<bool>,
}

impl Md {
    /// Construct a new Markdown formatter.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            header_done: Cell::new(false),
        }
    }
}

impl Formatter for Md {
    fn connected(&self, out: &mut dyn Write, info: &ConnectInfo) -> io::Result<()> {
        writeln!(
            out,
            "Connected to `{}` using `{}` in {:.4} ms\n",
            info.addr, info.format, info.connect_time_ms
        )
    }

    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()> {
        // print header once
        if !self.header_done.replace(true) {
            match self.mode {
                Mode::Report => writeln!(out, "| seq | value |\n|-----|-------|")?,
                Mode::Latency => writeln!(out, "| seq | wait_ms |\n|-----|---------|")?,
            }
        }

        match self.mode {
            Mode::Report => writeln!(out, "| {} | {} |", rec.seq, rec.value),
            Mode::Latency => writeln!(out, "| {} | {:.4} |", rec.seq, rec.wait_ms),
        }
    }

    fn summary(&self, out: &mut dyn Write, s: &Summary) -> io::Result<()> {
        writeln!(out, "\n### Summary\n")?;
        writeln!(out, "| field | value |")?;
        writeln!(out, "|-------|-------|")?;
        writeln!(out, "| address | {} |", s.addr)?;
        writeln!(out, "| samples | {} |", s.samples)?;
        writeln!(
            out,
            "| min / avg / max wait (ms) | {:.4} / {:.4} / {:.4} |",
            s.min_wait_ms, s.avg_wait_ms, s.max_wait_ms
        )?;
        writeln!(out, "| connect time (ms) | {:.4} |", s.connect_time_ms)?;
        writeln!(out, "| stopped | {} |\n", outcome_text(&s.outcome))
    }
}

/* ---------- ANSI-colored TTY ---------- */

pub struct Color {
    mode: Mode,
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

impl Formatter for Color {
    fn connected(&self, out: &mut dyn Write, info: &ConnectInfo) -> io::Result<()> {
        writeln!(
            out,
            "{GREEN}Connected{RESET} to {} ... ({}, {:.4} ms)",
            info.addr, info.format, info.connect_time_ms
        )
    }

    fn sample(&self, out: &mut dyn Write, rec: &SampleRecord) -> io::Result<()> {
        match self.mode {
            Mode::Report => writeln!(out, "Client <- Server: {GREEN}{}{RESET}", rec.value),
            Mode::Latency => writeln!(
                out,
                "Sample #{} after {GREEN}{:.4} ms{RESET}",
                rec.seq, rec.wait_ms
            ),
        }
    }

    fn summary(&self, out: &mut dyn Write, s: &Summary) -> io::Result<()> {
        let color = if s.outcome.is_failure() { RED } else { GREEN };
        writeln!(
            out,
            "\n--- {} tcprobe statistics ---\n\
{} samples received, {color}{}{RESET}",
            s.addr,
            s.samples,
            outcome_text(&s.outcome)
        )?;
        if self.mode == Mode::Latency && s.samples > 0 {
            writeln!(
                out,
                "Wait min/avg/max = {:.4}/{:.4}/{:.4} ms",
                s.min_wait_ms, s.avg_wait_ms, s.max_wait_ms
            )?;
        }
        Ok(())
    }
}

/* ---------- Factory ---------- */

pub fn from_mode(output: OutputMode, mode: Mode) -> Box<dyn Formatter> {
    match output {
        OutputMode::Normal => Box::new(Normal { mode }),
        OutputMode::Json => Box::new(Json),
        OutputMode::Csv => Box::new(Csv),
        OutputMode::Md => Box::new(Md::new(mode)),
        OutputMode::Color => Box::new(Color { mode }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn record(seq: u64, value: i64, wait_ms: f64) -> SampleRecord {
        SampleRecord {
            seq,
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9000),
            value,
            wait_ms,
        }
    }

    fn render(output: OutputMode, mode: Mode, recs: &[SampleRecord]) -> String {
        let fmt = from_mode(output, mode);
        let mut buf = Vec::new();
        for rec in recs {
            fmt.sample(&mut buf, rec).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn outcome_text_includes_failure_reason() {
        assert_eq!(
            outcome_text(&Outcome::Failed("reset by peer".into())),
            "read failed: reset by peer"
        );
        assert_eq!(outcome_text(&Outcome::PeerClosed), "connection closed by peer");
    }

    #[test]
    fn normal_report_line() {
        let text = render(OutputMode::Normal, Mode::Report, &[record(1, 42, 0.5)]);
        assert_eq!(text, "Client <- Server: 42\n");
    }

    #[test]
    fn normal_latency_line() {
        let text = render(OutputMode::Normal, Mode::Latency, &[record(3, 42, 1.25)]);
        assert_eq!(text, "Sample #3 after 1.2500 ms\n");
    }

    #[test]
    fn color_report_line_wraps_value() {
        let text = render(OutputMode::Color, Mode::Report, &[record(1, -7, 0.0)]);
        assert_eq!(text, "Client <- Server: \x1b[32m-7\x1b[0m\n");
    }

    #[test]
    fn markdown_header_printed_once() {
        let recs = [record(1, 10, 0.0), record(2, 20, 0.0)];
        let text = render(OutputMode::Md, Mode::Report, &recs);
        assert_eq!(text.matches("| seq | value |").count(), 1);
        assert!(text.ends_with("| 2 | 20 |\n"));
    }

    #[test]
    fn json_sample_is_one_object_per_line() {
        let text = render(OutputMode::Json, Mode::Report, &[record(1, 42, 0.5)]);
        let v: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(v["value"], 42);
        assert_eq!(v["seq"], 1);
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn closed_sink_surfaces_error() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let fmt = from_mode(OutputMode::Normal, Mode::Report);
        let err = fmt.sample(&mut Closed, &record(1, 1, 0.0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
