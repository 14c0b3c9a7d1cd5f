//! Destination row/slice pitch and conversion from the encoder's tight layout.
use crate::encode::{EncodedTexture, OutputFormat, TexelLayout};
use crate::error::{Error, Result};

/// Memory layout of a destination buffer whose rows may be padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitchLayout {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Format the destination was actually allocated with.
    pub format: OutputFormat,
    /// Texels per compression block along X and Y; `(1, 1)` for uncompressed formats.
    pub block: (u32, u32),
    /// Row pitch is rounded up to a multiple of this many bytes.
    pub row_alignment: usize,
}

impl PitchLayout {
    /// Tightly packed destination matching `layout`.
    pub fn tight(layout: &TexelLayout, format: OutputFormat) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            depth: layout.depth,
            format,
            block: (1, 1),
            row_alignment: 1,
        }
    }

    pub fn bytes_per_texel(&self) -> usize {
        self.format.bytes_per_texel()
    }

    pub fn with_row_alignment(mut self, row_alignment: usize) -> Self {
        self.row_alignment = row_alignment;
        self
    }

    pub fn with_block(mut self, block_x: u32, block_y: u32) -> Self {
        self.block = (block_x, block_y);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_alignment == 0 {
            return Err(Error::InvalidConfig("row alignment must be >= 1".into()));
        }
        if self.block.0 == 0 || self.block.1 == 0 {
            return Err(Error::InvalidConfig("block dimensions must be >= 1".into()));
        }
        Ok(())
    }

    /// Block rows per slice.
    pub fn rows(&self) -> usize {
        self.height.div_ceil(self.block.1.max(1)) as usize
    }

    /// Bytes between consecutive block rows, including padding.
    pub fn row_pitch(&self) -> usize {
        let blocks = self.width.div_ceil(self.block.0.max(1)) as usize;
        let bytes_per_block =
            self.bytes_per_texel() * self.block.0.max(1) as usize * self.block.1.max(1) as usize;
        (blocks * bytes_per_block).next_multiple_of(self.row_alignment.max(1))
    }

    pub fn slice_pitch(&self) -> usize {
        self.row_pitch() * self.rows()
    }

    pub fn byte_len(&self) -> usize {
        self.slice_pitch() * self.depth as usize
    }
}

/// Copies `texture` into a buffer laid out as `dest`, zero-filling row padding.
///
/// Refuses to reinterpret bytes: a format difference is a [`Error::FormatMismatch`].
pub fn repitch(texture: &EncodedTexture, dest: &PitchLayout) -> Result<Vec<u8>> {
    dest.validate()?;
    let src = &texture.layout;
    if texture.format != dest.format {
        return Err(Error::FormatMismatch {
            expected: texture.format,
            actual: dest.format,
        });
    }
    if dest.block != (1, 1) {
        return Err(Error::InvalidConfig(
            "block-compressed destinations are not supported".into(),
        ));
    }
    if (src.width, src.height, src.depth) != (dest.width, dest.height, dest.depth) {
        return Err(Error::SizeMismatch {
            expected: dest.width as usize * dest.height as usize * dest.depth as usize,
            actual: src.width as usize * src.height as usize * src.depth as usize,
        });
    }
    if texture.bytes.len() != src.byte_len() {
        return Err(Error::SizeMismatch {
            expected: src.byte_len(),
            actual: texture.bytes.len(),
        });
    }

    let src_row = src.row_stride();
    let dst_row = dest.row_pitch();
    if src_row == dst_row {
        return Ok(texture.bytes.clone());
    }

    let mut out = vec![0u8; dest.byte_len()];
    for z in 0..src.depth as usize {
        for y in 0..src.height as usize {
            let s = z * src.slice_stride() + y * src_row;
            let d = z * dest.slice_pitch() + y * dst_row;
            out[d..d + src_row].copy_from_slice(&texture.bytes[s..s + src_row]);
        }
    }
    Ok(out)
}
