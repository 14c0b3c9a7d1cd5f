use std::path::PathBuf;

use glam::DVec3;
use volume_bake::prelude::*;
use volume_bake_examples::{demo_fields, init_tracing, save_texture_png};

/// Bakes the settings in the RON file given as the first argument, or a built-in planet
/// shell when none is given.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            BakeSettings::from_ron_str(&text)?
        }
        None => {
            let settings = BakeSettings::new(
                RegionDescriptor::spherical_shell(DVec3::ZERO, 300.0, 500.0),
                GridResolution::volume(64, 32, 4),
                "sphere",
            )
            .with_format(OutputFormat::R8)
            .with_processing(ProcessingConfig::default().with_invert(true));
            println!("{}", settings.to_ron_string()?);
            settings
        }
    };

    let fields = demo_fields();
    if !fields.contains(&settings.field) {
        anyhow::bail!(
            "unknown field '{}'; available: {}",
            settings.field,
            fields.names().join(", ")
        );
    }
    let output = bake_from_registry(&settings, &fields)?;
    save_texture_png(&output.texture, "bake-from-settings.png")?;
    Ok(())
}
