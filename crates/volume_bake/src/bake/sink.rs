//! Presentation collaborator: where encoded textures are uploaded.
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::encode::{repitch, EncodedTexture, OutputFormat, PitchLayout, TexelLayout};
use crate::error::{Error, Result};
use crate::region::GridResolution;

/// Destination buffer of a bake target.
///
/// Only the scheduler's owner thread calls these methods.
pub trait TextureSink {
    /// Format the destination was actually allocated with. May differ from the requested one.
    fn format(&self) -> OutputFormat;

    fn resolution(&self) -> GridResolution;

    /// Writes `texture` into the destination, resolving any row/slice pitch.
    ///
    /// Must fail with [`Error::FormatMismatch`] if `texture` was encoded for another format.
    fn upload(&mut self, texture: &EncodedTexture) -> Result<()>;
}

#[derive(Debug)]
struct MemoryTextureState {
    resolution: GridResolution,
    format: OutputFormat,
    row_alignment: usize,
    bytes: Vec<u8>,
    uploads: usize,
}

/// In-memory destination with optional row padding.
///
/// Clones share the same storage, so a caller can keep a handle after giving one to the
/// scheduler.
#[derive(Clone, Debug)]
pub struct MemoryTexture {
    state: Arc<Mutex<MemoryTextureState>>,
}

impl MemoryTexture {
    /// Zero-filled destination with tightly packed rows.
    pub fn new(resolution: GridResolution, format: OutputFormat) -> Self {
        let state = MemoryTextureState {
            resolution,
            format,
            row_alignment: 1,
            bytes: Vec::new(),
            uploads: 0,
        };
        let texture = Self {
            state: Arc::new(Mutex::new(state)),
        };
        texture.reallocate();
        texture
    }

    /// Rounds every row up to a multiple of `row_alignment` bytes.
    ///
    /// Fails with [`Error::InvalidConfig`] when the padded layout is invalid, e.g. alignment `0`.
    pub fn with_row_alignment(self, row_alignment: usize) -> Result<Self> {
        {
            let mut state = self.lock();
            pitch_of(&state).with_row_alignment(row_alignment).validate()?;
            state.row_alignment = row_alignment;
        }
        self.reallocate();
        Ok(self)
    }

    /// Reallocates the destination with `format`, as a backend may do behind the caller's back.
    pub fn set_format(&self, format: OutputFormat) {
        self.lock().format = format;
        self.reallocate();
    }

    /// Destination layout, including row padding.
    pub fn pitch(&self) -> PitchLayout {
        let state = self.lock();
        pitch_of(&state)
    }

    /// Copy of the raw destination bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().bytes.clone()
    }

    /// Bytes of texel `(x, y, z)`, skipping row padding.
    pub fn texel(&self, x: u32, y: u32, z: u32) -> Option<Vec<u8>> {
        let state = self.lock();
        let pitch = pitch_of(&state);
        if x >= pitch.width || y >= pitch.height || z >= pitch.depth {
            return None;
        }
        let bpt = pitch.bytes_per_texel();
        let start =
            z as usize * pitch.slice_pitch() + y as usize * pitch.row_pitch() + x as usize * bpt;
        state.bytes.get(start..start + bpt).map(<[u8]>::to_vec)
    }

    /// Successful uploads so far.
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }

    fn reallocate(&self) {
        let mut state = self.lock();
        let len = pitch_of(&state).byte_len();
        state.bytes = vec![0; len];
    }

    fn lock(&self) -> MutexGuard<'_, MemoryTextureState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn pitch_of(state: &MemoryTextureState) -> PitchLayout {
    let layout = TexelLayout::new(&state.resolution, state.format);
    PitchLayout::tight(&layout, state.format).with_row_alignment(state.row_alignment)
}

impl TextureSink for MemoryTexture {
    fn format(&self) -> OutputFormat {
        self.lock().format
    }

    fn resolution(&self) -> GridResolution {
        self.lock().resolution
    }

    fn upload(&mut self, texture: &EncodedTexture) -> Result<()> {
        let mut state = self.lock();
        if texture.format != state.format {
            return Err(Error::FormatMismatch {
                expected: texture.format,
                actual: state.format,
            });
        }
        if texture.resolution != state.resolution {
            return Err(Error::SizeMismatch {
                expected: state.resolution.cell_count(),
                actual: texture.resolution.cell_count(),
            });
        }
        let bytes = repitch(texture, &pitch_of(&state))?;
        state.bytes = bytes;
        state.uploads += 1;
        debug!(
            "Uploaded {} texture ({} bytes).",
            state.resolution,
            state.bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::field::SampleBuffer;

    #[test]
    fn upload_writes_through_shared_handle() {
        let res = GridResolution::planar(3, 2);
        let texture = MemoryTexture::new(res, OutputFormat::R8)
            .with_row_alignment(4)
            .unwrap();
        let mut sink = texture.clone();
        let encoded = encode(
            &SampleBuffer::Scalar(vec![0.0, 0.5, 1.0, 1.0, 0.5, 0.0]),
            OutputFormat::R8,
            &res,
        )
        .unwrap();
        sink.upload(&encoded).unwrap();
        assert_eq!(texture.upload_count(), 1);
        assert_eq!(texture.bytes(), vec![0, 128, 255, 0, 255, 128, 0, 0]);
        assert_eq!(texture.texel(1, 1, 0), Some(vec![128]));
        assert_eq!(texture.texel(3, 0, 0), None);
    }

    #[test]
    fn zero_row_alignment_is_rejected_like_the_pitch_layout() {
        let res = GridResolution::planar(3, 2);
        let texture = MemoryTexture::new(res, OutputFormat::R8);
        assert!(matches!(
            texture.clone().with_row_alignment(0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            texture.pitch().with_row_alignment(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(texture.pitch().row_pitch(), 3);
        assert_eq!(texture.bytes().len(), 6);
    }

    #[test]
    fn upload_refuses_other_format() {
        let res = GridResolution::planar(1, 1);
        let mut texture = MemoryTexture::new(res, OutputFormat::RGBA16_FLOAT);
        texture.set_format(OutputFormat::BGRA8);
        let encoded = encode(
            &SampleBuffer::Scalar(vec![1.0]),
            OutputFormat::RGBA16_FLOAT,
            &res,
        )
        .unwrap();
        assert!(matches!(
            texture.upload(&encoded),
            Err(Error::FormatMismatch { .. })
        ));
        assert_eq!(texture.upload_count(), 0);
        assert_eq!(texture.bytes(), vec![0; 4]);
    }

    #[test]
    fn upload_refuses_other_resolution() {
        let mut texture = MemoryTexture::new(GridResolution::planar(2, 2), OutputFormat::R8);
        let encoded = encode(
            &SampleBuffer::Scalar(vec![1.0]),
            OutputFormat::R8,
            &GridResolution::planar(1, 1),
        )
        .unwrap();
        assert!(matches!(
            texture.upload(&encoded),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
