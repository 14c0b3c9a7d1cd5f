//! PNG previews of baked textures and tracing setup.
use std::path::Path;

use anyhow::Context;
use half::f16;
use image::{Rgba, RgbaImage};
use volume_bake::encode::{BitDepth, ChannelCount, EncodedTexture, OutputFormat};
use volume_bake::prelude::{GridResolution, MemoryTexture, TextureSink};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Decodes one texel of `format` into display RGBA8.
pub fn texel_to_rgba8(format: OutputFormat, bytes: &[u8]) -> [u8; 4] {
    let channel = |i: usize| -> f32 {
        match format.depth {
            BitDepth::Unorm8 => bytes[i] as f32 / 255.0,
            BitDepth::Float16 => f16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]).to_f32(),
            BitDepth::Float32 => f32::from_le_bytes([
                bytes[4 * i],
                bytes[4 * i + 1],
                bytes[4 * i + 2],
                bytes[4 * i + 3],
            ]),
        }
    };
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    match (format.channels, format.depth) {
        (ChannelCount::One, _) => {
            let g = to_u8(channel(0));
            [g, g, g, 255]
        }
        (ChannelCount::Four, BitDepth::Unorm8) => [bytes[2], bytes[1], bytes[0], bytes[3]],
        (ChannelCount::Four, _) => [
            to_u8(channel(0)),
            to_u8(channel(1)),
            to_u8(channel(2)),
            to_u8(channel(3)),
        ],
    }
}

/// Lays depth slices out left to right, top to bottom, in a near-square grid.
fn atlas(
    resolution: GridResolution,
    format: OutputFormat,
    texel: impl Fn(u32, u32, u32) -> Option<Vec<u8>>,
) -> RgbaImage {
    let (w, h, d) = (resolution.width(), resolution.height(), resolution.depth());
    let cols = (d as f64).sqrt().ceil().max(1.0) as u32;
    let rows = d.div_ceil(cols);
    let mut img = RgbaImage::from_pixel(w * cols, h * rows, Rgba([0, 0, 0, 255]));
    for z in 0..d {
        let (ox, oy) = ((z % cols) * w, (z / cols) * h);
        for y in 0..h {
            for x in 0..w {
                if let Some(bytes) = texel(x, y, z) {
                    img.put_pixel(ox + x, oy + y, Rgba(texel_to_rgba8(format, &bytes)));
                }
            }
        }
    }
    img
}

/// Writes an encoded texture as a PNG; volumes become a slice atlas.
pub fn save_texture_png(texture: &EncodedTexture, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let res = texture.resolution;
    let img = atlas(res, texture.format, |x, y, z| {
        texture
            .texel(res.cell_index(x, y, z))
            .map(<[u8]>::to_vec)
    });
    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}

/// Writes the current contents of a [`MemoryTexture`] as a PNG, skipping row padding.
pub fn save_memory_texture_png(
    texture: &MemoryTexture,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let img = atlas(texture.resolution(), texture.format(), |x, y, z| {
        texture.texel(x, y, z)
    });
    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}
