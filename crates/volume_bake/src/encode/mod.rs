//! Pixel Encoder: processed samples to tightly packed texel bytes.
//!
//! [`encode`] writes one texel per cell in region enumeration order. Rows are
//! `width * bytes_per_texel` bytes with no padding; [`TexelLayout`] exposes those strides so
//! a presentation collaborator can convert into a padded destination (see [`pitch`]).
use std::fmt;

use half::f16;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::field::SampleBuffer;
use crate::region::GridResolution;

pub mod pitch;

pub use pitch::{repitch, PitchLayout};

/// Channels stored per texel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelCount {
    One,
    Four,
}

impl ChannelCount {
    pub fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Four => 4,
        }
    }
}

/// Storage of a single channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// Unsigned normalized byte.
    Unorm8,
    /// IEEE 754 half float.
    Float16,
    /// IEEE 754 single float.
    Float32,
}

impl BitDepth {
    pub fn bytes(self) -> usize {
        match self {
            Self::Unorm8 => 1,
            Self::Float16 => 2,
            Self::Float32 => 4,
        }
    }
}

/// Destination texel format.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputFormat {
    pub channels: ChannelCount,
    pub depth: BitDepth,
}

impl OutputFormat {
    pub const R8: OutputFormat = OutputFormat::new(ChannelCount::One, BitDepth::Unorm8);
    pub const R16_FLOAT: OutputFormat = OutputFormat::new(ChannelCount::One, BitDepth::Float16);
    pub const R32_FLOAT: OutputFormat = OutputFormat::new(ChannelCount::One, BitDepth::Float32);
    /// Four 8-bit channels stored B, G, R, A.
    pub const BGRA8: OutputFormat = OutputFormat::new(ChannelCount::Four, BitDepth::Unorm8);
    pub const RGBA16_FLOAT: OutputFormat =
        OutputFormat::new(ChannelCount::Four, BitDepth::Float16);
    pub const RGBA32_FLOAT: OutputFormat =
        OutputFormat::new(ChannelCount::Four, BitDepth::Float32);

    pub const fn new(channels: ChannelCount, depth: BitDepth) -> Self {
        Self { channels, depth }
    }

    pub fn is_color(&self) -> bool {
        self.channels == ChannelCount::Four
    }

    pub fn bytes_per_texel(&self) -> usize {
        self.channels.get() * self.depth.bytes()
    }

    /// Short lowercase name, e.g. `r8` or `rgba16f`.
    pub fn name(&self) -> &'static str {
        match (self.channels, self.depth) {
            (ChannelCount::One, BitDepth::Unorm8) => "r8",
            (ChannelCount::One, BitDepth::Float16) => "r16f",
            (ChannelCount::One, BitDepth::Float32) => "r32f",
            (ChannelCount::Four, BitDepth::Unorm8) => "bgra8",
            (ChannelCount::Four, BitDepth::Float16) => "rgba16f",
            (ChannelCount::Four, BitDepth::Float32) => "rgba32f",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::RGBA16_FLOAT
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tight source layout of an encoded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexelLayout {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub bytes_per_texel: usize,
}

impl TexelLayout {
    pub fn new(resolution: &GridResolution, format: OutputFormat) -> Self {
        Self {
            width: resolution.width(),
            height: resolution.height(),
            depth: resolution.depth(),
            bytes_per_texel: format.bytes_per_texel(),
        }
    }

    /// Bytes between consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.bytes_per_texel
    }

    /// Bytes between consecutive depth slices.
    pub fn slice_stride(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    pub fn byte_len(&self) -> usize {
        self.slice_stride() * self.depth as usize
    }
}

/// Output of the encoder, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedTexture {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub resolution: GridResolution,
    pub layout: TexelLayout,
}

impl EncodedTexture {
    /// Bytes of the texel at linear cell index `i`.
    pub fn texel(&self, i: usize) -> Option<&[u8]> {
        let bpt = self.layout.bytes_per_texel;
        self.bytes.get(i * bpt..(i + 1) * bpt)
    }
}

/// `round(clamp(v, 0, 1) * 255)`.
#[inline]
pub fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Encodes `buffer` into `format`, one texel per cell of `resolution`.
///
/// Grayscale data written to four channels replicates into RGB with `A = 1`. Color data
/// written to one channel keeps R only; that narrowing is lossy and logged, not rejected.
pub fn encode(
    buffer: &SampleBuffer,
    format: OutputFormat,
    resolution: &GridResolution,
) -> Result<EncodedTexture> {
    let expected = resolution.cell_count();
    if buffer.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: buffer.len(),
        });
    }
    if matches!(buffer, SampleBuffer::Color(_)) && !format.is_color() {
        warn!(
            "Encoding color samples into single-channel {}; keeping R only.",
            format
        );
    }

    let layout = TexelLayout::new(resolution, format);
    let mut bytes = Vec::with_capacity(layout.byte_len());
    match format.channels {
        ChannelCount::One => {
            for i in 0..expected {
                let v = buffer.red(i).unwrap_or_default();
                push_channel(&mut bytes, format.depth, v);
            }
        }
        ChannelCount::Four => {
            for i in 0..expected {
                let c = buffer.rgba(i).unwrap_or_default();
                let order = match format.depth {
                    BitDepth::Unorm8 => [c.z, c.y, c.x, c.w],
                    BitDepth::Float16 | BitDepth::Float32 => c.to_array(),
                };
                for v in order {
                    push_channel(&mut bytes, format.depth, v);
                }
            }
        }
    }
    debug!(
        "Encoded {} cells as {} ({} bytes).",
        expected,
        format,
        bytes.len()
    );

    Ok(EncodedTexture {
        bytes,
        format,
        resolution: *resolution,
        layout,
    })
}

#[inline]
fn push_channel(out: &mut Vec<u8>, depth: BitDepth, v: f32) {
    match depth {
        BitDepth::Unorm8 => out.push(unorm8(v)),
        BitDepth::Float16 => out.extend_from_slice(&f16::from_f32(v).to_le_bytes()),
        BitDepth::Float32 => out.extend_from_slice(&v.to_le_bytes()),
    }
}
