use glam::{DVec2, DVec3};
use volume_bake::prelude::*;
use volume_bake_examples::{init_tracing, save_texture_png, ValueNoiseField};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A 1 km slab sampled at ground level.
    let settings = BakeSettings::new(
        RegionDescriptor::planar_slab(DVec3::ZERO, DVec2::splat(1_000.0), 0.0),
        GridResolution::planar(256, 256),
        "noise",
    )
    .with_format(OutputFormat::R8);

    let field = ValueNoiseField::new(42, 32, 1.0 / 50.0);
    let output = run_bake(&settings, &field)?;
    if let Some((min, max)) = output.summary.range {
        tracing::info!("Raw range after remap: [{min:.3}, {max:.3}].");
    }

    save_texture_png(&output.texture, "bake-planar-slab.png")?;
    Ok(())
}
