//! Synchronous bake pipeline: sample, query, process, encode.
use tracing::{debug, info};

use crate::bake::settings::BakeSettings;
use crate::encode::{encode, EncodedTexture};
use crate::error::{Error, Result};
use crate::field::{FieldAdapter, FieldRegistry, SampleBuffer, SampleKind, VolumeField};
use crate::process::{process, ProcessSummary};

/// Result of one pipeline run, ready for upload.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct BakeOutput {
    /// Encoded texels in tight source layout.
    pub texture: EncodedTexture,
    /// Processed samples before encoding.
    pub samples: SampleBuffer,
    pub kind: SampleKind,
    pub summary: ProcessSummary,
}

/// Runs every stage for `settings` against `field` on the calling thread.
///
/// Stages run strictly in order; each consumes the full output of the previous one.
pub fn run_bake(settings: &BakeSettings, field: &dyn VolumeField) -> Result<BakeOutput> {
    run_stages(settings, Some(field))
}

/// Like [`run_bake`], resolving the field by name in `fields`.
///
/// A missing field fails with [`Error::FieldUnavailable`] after positions were generated.
pub fn bake_from_registry(settings: &BakeSettings, fields: &FieldRegistry) -> Result<BakeOutput> {
    let field = fields.get(&settings.field);
    run_stages(settings, field.as_deref())
}

fn run_stages(settings: &BakeSettings, field: Option<&dyn VolumeField>) -> Result<BakeOutput> {
    settings.validate()?;
    let resolution = settings.resolution;
    let kind = settings.kind();

    let positions = settings.region.generate_positions(&resolution)?;
    debug!(
        "Generated {} positions over {} region.",
        positions.len(),
        settings.region.name()
    );

    let Some(field) = field else {
        return Err(Error::FieldUnavailable {
            field: settings.field.clone(),
        });
    };
    let mut samples =
        FieldAdapter::new(&settings.field, field).sample(&positions, settings.selector.as_ref());
    if samples.is_empty() {
        return Err(Error::FieldUnavailable {
            field: settings.field.clone(),
        });
    }

    let summary = process(&mut samples, kind, &settings.processing);
    let texture = encode(&samples, settings.format, &resolution)?;
    info!(
        "Baked '{}' {} as {:?} into {} ({} bytes).",
        settings.field,
        resolution,
        kind,
        settings.format,
        texture.bytes.len()
    );

    Ok(BakeOutput {
        texture,
        samples,
        kind,
        summary,
    })
}
