use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use volume_bake::prelude::*;
use volume_bake_examples::{demo_fields, init_tracing, save_memory_texture_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scheduler = BakeScheduler::new(Arc::new(demo_fields()));

    // Atmosphere shell between 450 and 600 units; W selects the radius.
    let res = GridResolution::volume(64, 32, 8);
    let settings = BakeSettings::new(
        RegionDescriptor::spherical_shell(DVec3::ZERO, 450.0, 600.0),
        res,
        "noise",
    )
    .with_format(OutputFormat::RGBA16_FLOAT)
    .with_limits(GridLimits::EDITOR)
    .with_processing(ProcessingConfig::default().with_multiplier(1.5));

    // Rows padded to 256 bytes, as many upload paths require.
    let texture = MemoryTexture::new(res, OutputFormat::RGBA16_FLOAT).with_row_alignment(256)?;
    let pitch = texture.pitch();
    tracing::info!(
        "Destination row pitch {} bytes, slice pitch {} bytes.",
        pitch.row_pitch(),
        pitch.slice_pitch()
    );

    let id = scheduler.register(settings, Box::new(texture.clone()))?;
    scheduler.submit(id)?;

    let mut events = VecSink::new();
    let reports = scheduler.wait_idle(Duration::from_secs(60), &mut events);
    for report in &reports {
        match &report.result {
            Ok(summary) => tracing::info!("{} -> {:?}", report.target, summary),
            Err(e) => anyhow::bail!("target {} failed: {e}", report.target),
        }
    }
    tracing::info!("{} event(s) delivered.", events.len());

    save_memory_texture_png(&texture, "bake-shell-volume.png")?;
    Ok(())
}
