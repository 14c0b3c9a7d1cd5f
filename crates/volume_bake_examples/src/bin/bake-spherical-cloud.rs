use std::sync::Arc;
use std::time::Duration;

use glam::{DVec3, Vec4};
use volume_bake::prelude::*;
use volume_bake_examples::{
    init_tracing, save_memory_texture_png, GradientColorField, ValueNoiseField,
};

const PLANET_RADIUS: f64 = 500.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut fields = FieldRegistry::new();
    fields.register("clouds", ValueNoiseField::new(11, 32, 1.0 / 40.0));
    fields.register(
        "land",
        GradientColorField::new(
            Vec4::new(0.1, 0.3, 0.6, 1.0),
            Vec4::new(0.9, 0.9, 0.8, 1.0),
            (-PLANET_RADIUS, PLANET_RADIUS),
        ),
    );
    let mut scheduler = BakeScheduler::new(Arc::new(fields));

    // Two layers on the same sphere: grayscale cloud cover and a color land map.
    let res = GridResolution::planar(512, 256);
    let sphere = RegionDescriptor::equirectangular_sphere(DVec3::ZERO, PLANET_RADIUS);

    let clouds = MemoryTexture::new(res, OutputFormat::BGRA8);
    scheduler.register(
        BakeSettings::new(sphere.clone(), res, "clouds")
            .with_format(OutputFormat::BGRA8)
            .with_bake_on_start(true),
        Box::new(clouds.clone()),
    )?;

    let land = MemoryTexture::new(res, OutputFormat::BGRA8);
    let land_id = scheduler.register(
        BakeSettings::new(sphere, res, "land")
            .with_selector(FieldSelector::color("albedo"))
            .with_format(OutputFormat::BGRA8),
        Box::new(land.clone()),
    )?;

    // Clouds are still baking, so only the land layer starts here.
    let started = scheduler.rebake_all();
    tracing::info!(
        "rebake_all started {} bake(s); land baking: {}.",
        started.len(),
        scheduler.is_baking(land_id)
    );

    let mut log = FnSink::new(|event: BakeEvent| tracing::debug!("{event:?}"));
    for report in scheduler.wait_idle(Duration::from_secs(60), &mut log) {
        if let Err(e) = &report.result {
            anyhow::bail!("target {} failed: {e}", report.target);
        }
    }

    save_memory_texture_png(&clouds, "bake-spherical-cloud.png")?;
    save_memory_texture_png(&land, "bake-spherical-land.png")?;
    Ok(())
}
