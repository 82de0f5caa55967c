//! Sample wire format.
//!
//! The peer writes raw signed integers back to back, with no length prefix
//! or delimiter. Both the width and the byte order are explicit parameters
//! so the client does not silently depend on the host's `int` layout.

use clap::ValueEnum;
use std::fmt;

/// Size of one sample on the wire.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// 32-bit signed integer
    #[value(name = "4")]
    Four,
    /// 64-bit signed integer
    #[value(name = "8")]
    Eight,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::Four => 4,
            Width::Eight => 8,
        }
    }
}

/// Byte order of one sample on the wire.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// Whatever this host uses
    Native,
    Little,
    Big,
}

/// Width + byte order of every sample on a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleFormat {
    pub width: Width,
    pub order: ByteOrder,
}

/// Largest sample the format supports, sized for read buffers.
pub const MAX_SAMPLE_BYTES: usize = 8;

impl SampleFormat {
    pub const fn new(width: Width, order: ByteOrder) -> Self {
        Self { width, order }
    }

    /// Number of bytes making up one sample.
    pub const fn size(&self) -> usize {
        self.width.bytes()
    }

    /// Decode exactly [`size`](Self::size) bytes into a value.
    ///
    /// Returns `None` if `buf` has the wrong length.
    pub fn decode(&self, buf: &[u8]) -> Option<i64> {
        match self.width {
            Width::Four => {
                let raw: [u8; 4] = buf.try_into().ok()?;
                Some(i64::from(match self.order {
                    ByteOrder::Native => i32::from_ne_bytes(raw),
                    ByteOrder::Little => i32::from_le_bytes(raw),
                    ByteOrder::Big => i32::from_be_bytes(raw),
                }))
            }
            Width::Eight => {
                let raw: [u8; 8] = buf.try_into().ok()?;
                Some(match self.order {
                    ByteOrder::Native => i64::from_ne_bytes(raw),
                    ByteOrder::Little => i64::from_le_bytes(raw),
                    ByteOrder::Big => i64::from_be_bytes(raw),
                })
            }
        }
    }

    /// Encode `value` the way a peer would put it on the wire.
    ///
    /// Values outside the range of a 4-byte sample are truncated.
    pub fn encode(&self, value: i64) -> Vec<u8> {
        match self.width {
            Width::Four => {
                let v = value as i32;
                match self.order {
                    ByteOrder::Native => v.to_ne_bytes().to_vec(),
                    ByteOrder::Little => v.to_le_bytes().to_vec(),
                    ByteOrder::Big => v.to_be_bytes().to_vec(),
                }
            }
            Width::Eight => match self.order {
                ByteOrder::Native => value.to_ne_bytes().to_vec(),
                ByteOrder::Little => value.to_le_bytes().to_vec(),
                ByteOrder::Big => value.to_be_bytes().to_vec(),
            },
        }
    }
}

impl Default for SampleFormat {
    fn default() -> Self {
        Self::new(Width::Four, ByteOrder::Native)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            ByteOrder::Native => "native",
            ByteOrder::Little => "le",
            ByteOrder::Big => "be",
        };
        write!(f, "i{}/{}", self.size() * 8, order)
    }
}
