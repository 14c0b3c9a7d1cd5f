//! Field adapter: the boundary between the baking pipeline and the volume field being sampled.
//!
//! - Implement [`VolumeField`] for the engine that answers position queries.
//! - Keep fields by name in a [`FieldRegistry`].
//! - Use [`FieldAdapter`] to classify a selector into a [`SampleKind`] and fetch a
//!   [`SampleBuffer`] for a batch of positions.
use glam::{DVec3, Vec4};
use mint::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod adapter;
pub mod buffer;
pub mod registry;

pub use adapter::FieldAdapter;
pub use buffer::SampleBuffer;
pub use registry::FieldRegistry;

/// Semantic kind of the samples a bake produces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SampleKind {
    /// Default field of the layer (e.g. raw signed distance), grayscale.
    #[default]
    None,
    /// Scalar metadata, grayscale.
    Scalar,
    /// Unit vectors in `[-1, 1]`, stored as RGB.
    Vector,
    /// Four independent channels.
    Color,
}

impl SampleKind {
    /// `None` and `Scalar` write the same value into R, G and B.
    pub fn is_grayscale(&self) -> bool {
        matches!(self, Self::None | Self::Scalar)
    }
}

/// Declared value type of a metadata channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Float,
    Normal,
    LinearColor,
}

/// Identifies the metadata channel to sample. Absent selector means the default field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    pub name: String,
    pub value_type: ValueType,
}

impl FieldSelector {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Float)
    }

    pub fn normal(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Normal)
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::LinearColor)
    }
}

/// Raw answer of a field query.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSamples {
    pub kind: SampleKind,
    pub values: SampleBuffer,
}

impl FieldSamples {
    pub fn new(kind: SampleKind, values: SampleBuffer) -> Self {
        Self { kind, values }
    }
}

/// A volume that can be sampled at arbitrary world positions.
///
/// Implementations are queried from worker threads.
pub trait VolumeField: Send + Sync {
    /// Whether the field can answer queries right now.
    fn is_ready(&self) -> bool {
        true
    }

    /// Samples `selector` (or the default field when `None`) at every position, in order.
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples>;
}

/// Field backed by a closure returning one scalar per position.
///
/// Answers the default field and `Float` selectors.
pub struct ScalarFnField<F>
where
    F: Fn(DVec3) -> f32 + Send + Sync,
{
    f: F,
}

impl<F> ScalarFnField<F>
where
    F: Fn(DVec3) -> f32 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> VolumeField for ScalarFnField<F>
where
    F: Fn(DVec3) -> f32 + Send + Sync,
{
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        let kind = FieldAdapter::classify(selector);
        if !kind.is_grayscale() {
            return Err(Error::InvalidConfig(format!(
                "scalar field cannot answer {kind:?} selector"
            )));
        }
        let values = positions.iter().map(|&p| (self.f)(DVec3::from(p))).collect();
        Ok(FieldSamples::new(kind, SampleBuffer::Scalar(values)))
    }
}

/// Field backed by a closure returning four channels per position.
///
/// Answers `Normal` (XYZ in the first three channels) and `LinearColor` selectors.
pub struct ColorFnField<F>
where
    F: Fn(DVec3) -> Vec4 + Send + Sync,
{
    f: F,
}

impl<F> ColorFnField<F>
where
    F: Fn(DVec3) -> Vec4 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> VolumeField for ColorFnField<F>
where
    F: Fn(DVec3) -> Vec4 + Send + Sync,
{
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        let kind = FieldAdapter::classify(selector);
        if kind.is_grayscale() {
            return Err(Error::InvalidConfig(format!(
                "color field cannot answer {kind:?} selector"
            )));
        }
        let values = positions.iter().map(|&p| (self.f)(DVec3::from(p))).collect();
        Ok(FieldSamples::new(kind, SampleBuffer::Color(values)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// Returns a fixed answer regardless of the positions.
    pub struct FixedField {
        pub samples: FieldSamples,
        pub ready: AtomicBool,
    }

    impl FixedField {
        pub fn scalar(values: Vec<f32>) -> Self {
            Self::new(FieldSamples::new(
                SampleKind::None,
                SampleBuffer::Scalar(values),
            ))
        }

        pub fn new(samples: FieldSamples) -> Self {
            Self {
                samples,
                ready: AtomicBool::new(true),
            }
        }

        pub fn set_ready(&self, ready: bool) {
            self.ready.store(ready, Ordering::SeqCst);
        }
    }

    impl VolumeField for FixedField {
        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn sample(
            &self,
            _positions: &[Vector3<f64>],
            _selector: Option<&FieldSelector>,
        ) -> Result<FieldSamples> {
            Ok(self.samples.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_kinds() {
        assert!(SampleKind::None.is_grayscale());
        assert!(SampleKind::Scalar.is_grayscale());
        assert!(!SampleKind::Vector.is_grayscale());
        assert!(!SampleKind::Color.is_grayscale());
    }

    #[test]
    fn scalar_fn_field_samples_in_order() {
        let field = ScalarFnField::new(|p: DVec3| p.x as f32);
        let positions: Vec<Vector3<f64>> = (0..4)
            .map(|i| DVec3::new(i as f64, 0.0, 0.0).into())
            .collect();
        let samples = field.sample(&positions, None).expect("default field");
        assert_eq!(samples.kind, SampleKind::None);
        assert_eq!(
            samples.values,
            SampleBuffer::Scalar(vec![0.0, 1.0, 2.0, 3.0])
        );
        assert!(field
            .sample(&positions, Some(&FieldSelector::color("tint")))
            .is_err());
    }

    #[test]
    fn color_fn_field_answers_normal_selector() {
        let field = ColorFnField::new(|p: DVec3| p.normalize_or_zero().as_vec3().extend(0.0));
        let positions = vec![DVec3::Z.into()];
        let samples = field
            .sample(&positions, Some(&FieldSelector::normal("n")))
            .expect("normal selector");
        assert_eq!(samples.kind, SampleKind::Vector);
        assert_eq!(samples.values, SampleBuffer::Color(vec![Vec4::Z]));
        assert!(field.sample(&positions, None).is_err());
    }
}
