//! Argument parsing layer (clap).

use crate::wire::{ByteOrder, SampleFormat, Width};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Host name or IP address of the peer
    pub address: String,

    /// TCP port of the peer
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// What to report per sample (`-m`)
    #[arg(short, long, value_enum, default_value_t = Mode::Report)]
    pub mode: Mode,

    /// Sample width in bytes (`-w`)
    #[arg(short, long, value_enum, default_value_t = Width::Four)]
    pub width: Width,

    /// Byte order of each sample on the wire (`-b`)
    #[arg(short, long, value_enum, default_value_t = ByteOrder::Native)]
    pub byte_order: ByteOrder,

    /// Stop after this many samples (`-c`)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Timeout per connection attempt (ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout_ms: Option<u64>,

    /// Give up when a sample takes longer than this to arrive (ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout_ms: Option<u64>,

    /// Output format (`-o`)
    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = OutputMode::Normal,
        help = "normal | json | csv | md | color"
    )]
    pub output_mode: OutputMode,

    /// Diagnostic verbosity on stderr, repeat for more (`-v`)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn sample_format(&self) -> SampleFormat {
        SampleFormat::new(self.width, self.byte_order)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

/// Per-sample reporting policy.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Print each received value
    Report,
    /// Print how long each value took to arrive
    Latency,
}

/// Supported output modes.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Normal,
    Json,
    Csv,
    Md,    // Markdown
    Color, // ANSI-colored TTY
}
