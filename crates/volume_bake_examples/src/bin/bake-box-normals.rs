use glam::DVec3;
use volume_bake::prelude::*;
use volume_bake_examples::{init_tracing, save_texture_png, SphereNormalField};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = BakeSettings::new(
        RegionDescriptor::boxed(DVec3::ZERO, DVec3::splat(100.0)),
        GridResolution::volume(32, 32, 16),
        "normals",
    )
    .with_selector(FieldSelector::normal("normal"))
    .with_format(OutputFormat::BGRA8);

    let output = run_bake(&settings, &SphereNormalField::new(DVec3::ZERO))?;
    tracing::info!(
        "Baked {:?} data, {} bytes.",
        output.kind,
        output.texture.bytes.len()
    );

    save_texture_png(&output.texture, "bake-box-normals.png")?;
    Ok(())
}
