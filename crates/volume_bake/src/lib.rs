#![forbid(unsafe_code)]
//! volume_bake: Bake volumetric fields into 2D/3D texture buffers.
//!
//! Modules:
//! - region: world-space sample positions for box, spherical shell, equirectangular sphere and planar slab grids
//! - field: the field-query boundary (selectors, sample kinds, registry, adapter)
//! - process: remap, multiply, invert, normalize and clamp
//! - encode: texel packing (R8, R16F, R32F, BGRA8, RGBA16F, RGBA32F) and pitch conversion
//! - bake: settings, pipeline runner, destinations, events, scheduler
//!
//! For examples and docs, see README.
pub mod bake;
pub mod encode;
pub mod error;
pub mod field;
pub mod process;
pub mod region;

/// Convenient re-exports for common types. Import with `use volume_bake::prelude::*;`.
pub mod prelude {
    pub use crate::bake::{
        bake_from_registry, run_bake, BakeEvent, BakeHandle, BakeOutput, BakeReport,
        BakeScheduler, BakeSettings, BakeSummary, EventSink, FnSink, MemoryTexture,
        Submission, TargetId, TextureSink, VecSink,
    };
    pub use crate::encode::{
        encode, repitch, BitDepth, ChannelCount, EncodedTexture, OutputFormat, PitchLayout,
        TexelLayout,
    };
    pub use crate::error::{Error, Result};
    pub use crate::field::{
        ColorFnField, FieldAdapter, FieldRegistry, FieldSamples, FieldSelector, SampleBuffer,
        SampleKind, ScalarFnField, ValueType, VolumeField,
    };
    pub use crate::process::{process, ProcessSummary, ProcessingConfig};
    pub use crate::region::{
        BoxRegion, EquirectSphereRegion, GridLimits, GridResolution, PlanarSlabRegion,
        RegionDescriptor, RegionSampling, SphericalShellRegion,
    };
}
