//! Value processing applied to raw field samples before encoding.
//!
//! Grayscale samples run `remap -> multiply -> invert` per element while tracking the
//! global range, then a second pass either normalizes against that range or clamps to
//! `[0, 1]`. Color samples run the same chain per channel and always clamp. Vector
//! samples are normals and only get the fixed `v * 0.5 + 0.5` remap.
use glam::Vec4;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::field::{SampleBuffer, SampleKind};

/// Transform chain settings for one bake.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessingConfig {
    /// Map `[-1, 1]` to `[0, 1]` via `(v + 1) / 2`.
    pub remap_neg_to_pos: bool,
    /// Stretch grayscale output to the observed `[min, max]`.
    pub auto_normalize: bool,
    /// Replace `v` with `1 - v`.
    pub invert: bool,
    pub multiplier: f32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            remap_neg_to_pos: true,
            auto_normalize: true,
            invert: false,
            multiplier: 1.0,
        }
    }
}

impl ProcessingConfig {
    /// Every step disabled; only the final clamp applies.
    pub fn passthrough() -> Self {
        Self {
            remap_neg_to_pos: false,
            auto_normalize: false,
            invert: false,
            multiplier: 1.0,
        }
    }

    pub fn with_remap(mut self, remap_neg_to_pos: bool) -> Self {
        self.remap_neg_to_pos = remap_neg_to_pos;
        self
    }

    pub fn with_auto_normalize(mut self, auto_normalize: bool) -> Self {
        self.auto_normalize = auto_normalize;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "multiplier must be finite, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }

    /// Remap, multiply and invert a single value.
    #[inline]
    pub fn transform(&self, v: f32) -> f32 {
        let mut v = v;
        if self.remap_neg_to_pos {
            v = (v + 1.0) * 0.5;
        }
        v *= self.multiplier;
        if self.invert {
            v = 1.0 - v;
        }
        v
    }
}

/// What the processor did with a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessSummary {
    /// Range after the first pass; grayscale data only.
    pub range: Option<(f32, f32)>,
    /// Whether the normalize pass ran instead of the clamp pass.
    pub normalized: bool,
}

/// Applies the transform chain for `kind` to `buffer` in place.
///
/// Grayscale kinds stored as color are collapsed to their R channel first.
pub fn process(
    buffer: &mut SampleBuffer,
    kind: SampleKind,
    config: &ProcessingConfig,
) -> ProcessSummary {
    if kind.is_grayscale() && matches!(buffer, SampleBuffer::Color(_)) {
        *buffer = std::mem::take(buffer).into_grayscale().into();
    }

    match buffer {
        SampleBuffer::Scalar(values) => process_grayscale(values, config),
        SampleBuffer::Color(values) => {
            if kind == SampleKind::Vector {
                process_normals(values);
            } else {
                process_color(values, config);
            }
            ProcessSummary {
                range: None,
                normalized: false,
            }
        }
    }
}

/// Two-pass grayscale path.
///
/// Values that are not finite after the transform count as `0` and do not widen the range.
pub fn process_grayscale(values: &mut [f32], config: &ProcessingConfig) -> ProcessSummary {
    if values.is_empty() {
        return ProcessSummary {
            range: None,
            normalized: false,
        };
    }

    let mut min_v = f32::MAX;
    let mut max_v = -f32::MAX;
    let mut non_finite = 0usize;
    for v in values.iter_mut() {
        *v = config.transform(*v);
        if !v.is_finite() {
            non_finite += 1;
            *v = 0.0;
        }
        min_v = min_v.min(*v);
        max_v = max_v.max(*v);
    }
    if non_finite > 0 {
        warn!(
            "{} of {} grayscale samples were not finite; treated as 0.",
            non_finite,
            values.len()
        );
    }

    let normalized = config.auto_normalize && max_v > min_v;
    if normalized {
        let range = max_v - min_v;
        for v in values.iter_mut() {
            *v = (*v - min_v) / range;
        }
    } else {
        for v in values.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }
    debug!(
        "Processed {} grayscale samples, range [{}, {}], normalized: {}.",
        values.len(),
        min_v,
        max_v,
        normalized
    );

    ProcessSummary {
        range: Some((min_v, max_v)),
        normalized,
    }
}

/// Per-channel color path; normalization does not apply. Non-finite channels become `0`.
pub fn process_color(values: &mut [Vec4], config: &ProcessingConfig) {
    for c in values.iter_mut() {
        *c = finite_or_zero(Vec4::new(
            config.transform(c.x),
            config.transform(c.y),
            config.transform(c.z),
            config.transform(c.w),
        ))
        .clamp(Vec4::ZERO, Vec4::ONE);
    }
}

/// Fixed normal remap `[-1, 1] -> [0, 1]` with opaque alpha. Non-finite components map to `0.5`.
pub fn process_normals(values: &mut [Vec4]) {
    for n in values.iter_mut() {
        let rgb = finite_or_zero(*n).truncate() * 0.5 + 0.5;
        *n = rgb.extend(1.0);
    }
}

#[inline]
fn finite_or_zero(v: Vec4) -> Vec4 {
    Vec4::select(v.is_finite_mask(), v, Vec4::ZERO)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const EPS: f32 = 1e-6;

    fn grayscale(values: Vec<f32>, kind: SampleKind, config: &ProcessingConfig) -> Vec<f32> {
        let mut buf = SampleBuffer::Scalar(values);
        process(&mut buf, kind, config);
        buf.into_grayscale()
    }

    fn random_values(seed: u64, n: usize, scale: f32) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| (rng.next_u32() as f32 / u32::MAX as f32 * 2.0 - 1.0) * scale)
            .collect()
    }

    #[test]
    fn default_field_of_zeros_lands_on_half() {
        let out = grayscale(vec![0.0; 8], SampleKind::None, &ProcessingConfig::default());
        assert_eq!(out, vec![0.5; 8]);
    }

    #[test]
    fn remap_then_normalize() {
        let config = ProcessingConfig::default();
        let out = grayscale(vec![-1.0, 0.0, 1.0, 2.0], SampleKind::Scalar, &config);
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        for (a, b) in out.iter().zip(expected) {
            assert!((a - b).abs() < EPS, "{a} vs {b}");
        }
    }

    #[test]
    fn zero_multiplier_with_normalize_is_uniform_zero() {
        let config = ProcessingConfig::default().with_multiplier(0.0);
        let out = grayscale(vec![-3.0, 0.2, 7.0], SampleKind::None, &config);
        assert_eq!(out, vec![0.0; 3]);
    }

    #[test]
    fn constant_input_is_clamped_not_nan() {
        let config = ProcessingConfig::default().with_remap(false).with_multiplier(3.0);
        let out = grayscale(vec![0.5; 4], SampleKind::None, &config);
        assert_eq!(out, vec![1.0; 4]);
    }

    #[test]
    fn normalization_spans_unit_range() {
        let config = ProcessingConfig::default()
            .with_remap(false)
            .with_multiplier(2.5)
            .with_invert(true);
        for seed in 0..8 {
            let out = grayscale(random_values(seed, 257, 40.0), SampleKind::Scalar, &config);
            let min = out.iter().copied().fold(f32::MAX, f32::min);
            let max = out.iter().copied().fold(-f32::MAX, f32::max);
            assert!(min.abs() < EPS, "min {min}");
            assert!((max - 1.0).abs() < EPS, "max {max}");
        }
    }

    #[test]
    fn passthrough_is_idempotent_on_unit_values() {
        let config = ProcessingConfig::passthrough();
        let input: Vec<f32> = random_values(3, 64, 1.0).iter().map(|v| v.abs()).collect();
        let once = grayscale(input.clone(), SampleKind::Scalar, &config);
        let twice = grayscale(once.clone(), SampleKind::Scalar, &config);
        assert_eq!(once, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn invert_is_self_inverse() {
        let config = ProcessingConfig::passthrough().with_invert(true);
        let input: Vec<f32> = (0..=10).map(|i| i as f32 / 10.0).collect();
        let back = grayscale(
            grayscale(input.clone(), SampleKind::Scalar, &config),
            SampleKind::Scalar,
            &config,
        );
        for (a, b) in back.iter().zip(&input) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn empty_buffer_is_a_no_op() {
        let mut buf = SampleBuffer::Scalar(Vec::new());
        let summary = process(&mut buf, SampleKind::Scalar, &ProcessingConfig::default());
        assert!(buf.is_empty());
        assert_eq!(summary.range, None);

        let mut buf = SampleBuffer::Color(Vec::new());
        process(&mut buf, SampleKind::Color, &ProcessingConfig::default());
        assert!(buf.is_empty());
    }

    #[test]
    fn color_channels_are_independent_and_never_normalized() {
        let config = ProcessingConfig::default();
        let mut buf = SampleBuffer::Color(vec![
            Vec4::new(-1.0, 0.0, 1.0, 3.0),
            Vec4::new(-0.5, -0.5, -0.5, -0.5),
        ]);
        let summary = process(&mut buf, SampleKind::Color, &config);
        assert!(!summary.normalized);
        let colors = buf.as_color().expect("color storage");
        assert_eq!(colors[0], Vec4::new(0.0, 0.5, 1.0, 1.0));
        assert_eq!(colors[1], Vec4::splat(0.25));
    }

    #[test]
    fn normals_ignore_processing_knobs() {
        let config = ProcessingConfig::default()
            .with_invert(true)
            .with_multiplier(10.0);
        let mut buf = SampleBuffer::Color(vec![Vec4::new(-1.0, 0.0, 1.0, 0.0)]);
        process(&mut buf, SampleKind::Vector, &config);
        assert_eq!(
            buf.as_color().expect("color storage")[0],
            Vec4::new(0.0, 0.5, 1.0, 1.0)
        );
    }

    #[test]
    fn grayscale_in_color_storage_collapses_to_red() {
        let mut buf = SampleBuffer::Color(vec![Vec4::new(0.2, 9.0, 9.0, 9.0)]);
        process(&mut buf, SampleKind::None, &ProcessingConfig::passthrough());
        assert_eq!(buf, SampleBuffer::Scalar(vec![0.2]));
    }

    #[test]
    fn non_finite_grayscale_samples_count_as_zero() {
        let out = grayscale(
            vec![f32::NAN, 0.0, 1.0],
            SampleKind::Scalar,
            &ProcessingConfig::default(),
        );
        assert_eq!(out, vec![0.0, 0.5, 1.0]);

        let mut values = vec![f32::INFINITY, -1.0, 1.0];
        let summary = process_grayscale(&mut values, &ProcessingConfig::default());
        assert_eq!(values, vec![0.0, 0.0, 1.0]);
        assert_eq!(summary.range, Some((0.0, 1.0)));
    }

    #[test]
    fn non_finite_color_and_normal_channels_are_zeroed() {
        let mut colors = vec![Vec4::new(f32::NAN, 1.0, f32::NEG_INFINITY, 1.0)];
        process_color(&mut colors, &ProcessingConfig::default());
        assert_eq!(colors[0], Vec4::new(0.0, 1.0, 0.0, 1.0));

        let mut normals = vec![Vec4::new(f32::NAN, 1.0, 0.0, 0.0)];
        process_normals(&mut normals);
        assert_eq!(normals[0], Vec4::new(0.5, 1.0, 0.5, 1.0));
    }

    #[test]
    fn validate_rejects_non_finite_multiplier() {
        assert!(ProcessingConfig::default()
            .with_multiplier(f32::NAN)
            .validate()
            .is_err());
        assert!(ProcessingConfig::default()
            .with_multiplier(0.0)
            .validate()
            .is_ok());
    }
}
