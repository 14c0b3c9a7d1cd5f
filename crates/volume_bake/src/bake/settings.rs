//! Per-target bake configuration.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::encode::OutputFormat;
use crate::error::{Error, Result};
use crate::field::{FieldAdapter, FieldSelector, SampleKind};
use crate::process::ProcessingConfig;
use crate::region::{GridLimits, GridResolution, RegionDescriptor};

/// Everything needed to bake one target. Read-only for the duration of a bake.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BakeSettings {
    /// Region sampled by the bake.
    pub region: RegionDescriptor,
    /// Cells per axis of the destination.
    pub resolution: GridResolution,
    /// Registry name of the field to query.
    pub field: String,
    /// Metadata channel to sample; `None` samples the default field.
    #[cfg_attr(feature = "serde", serde(default))]
    pub selector: Option<FieldSelector>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub processing: ProcessingConfig,
    /// Requested destination format.
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: OutputFormat,
    /// Submit as soon as the target is registered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bake_on_start: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: GridLimits,
}

impl BakeSettings {
    /// Creates settings sampling the default field of `field` with default processing.
    pub fn new(
        region: RegionDescriptor,
        resolution: GridResolution,
        field: impl Into<String>,
    ) -> Self {
        Self {
            region,
            resolution,
            field: field.into(),
            selector: None,
            processing: ProcessingConfig::default(),
            format: OutputFormat::default(),
            bake_on_start: false,
            limits: GridLimits::default(),
        }
    }

    pub fn with_selector(mut self, selector: FieldSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_processing(mut self, processing: ProcessingConfig) -> Self {
        self.processing = processing;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_bake_on_start(mut self, bake_on_start: bool) -> Self {
        self.bake_on_start = bake_on_start;
        self
    }

    pub fn with_limits(mut self, limits: GridLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sample kind this target produces.
    pub fn kind(&self) -> SampleKind {
        FieldAdapter::classify(self.selector.as_ref())
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.field.is_empty() {
            return Err(Error::InvalidConfig("field name must not be empty".into()));
        }
        self.resolution.validate(&self.limits)?;
        self.region.validate(&self.resolution)?;
        self.processing.validate()?;
        Ok(())
    }

    #[cfg(feature = "ron")]
    pub fn from_ron_str(s: &str) -> Result<Self> {
        ron::from_str(s).map_err(|e| Error::InvalidConfig(format!("settings: {e}")))
    }

    #[cfg(feature = "ron")]
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Other(format!("settings: {e}")))
    }
}
