//! Selector classification and field sampling.
use mint::Vector3;
use tracing::{debug, warn};

use crate::field::{FieldSelector, SampleBuffer, SampleKind, ValueType, VolumeField};

/// Thin wrapper around a [`VolumeField`] that fixes the [`SampleKind`] of a bake.
///
/// A failed or malformed query yields an empty buffer; the caller treats that as a
/// failed bake, never as "all zero".
pub struct FieldAdapter<'a> {
    field: &'a dyn VolumeField,
    name: &'a str,
}

impl<'a> FieldAdapter<'a> {
    pub fn new(name: &'a str, field: &'a dyn VolumeField) -> Self {
        Self { field, name }
    }

    /// Sample kind implied by the selector's declared value type.
    pub fn classify(selector: Option<&FieldSelector>) -> SampleKind {
        match selector.map(|s| s.value_type) {
            None => SampleKind::None,
            Some(ValueType::Float) => SampleKind::Scalar,
            Some(ValueType::Normal) => SampleKind::Vector,
            Some(ValueType::LinearColor) => SampleKind::Color,
        }
    }

    /// Queries the field at `positions`.
    pub fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> SampleBuffer {
        let kind = Self::classify(selector);
        if !self.field.is_ready() {
            warn!("Field '{}' is not ready.", self.name);
            return SampleBuffer::default();
        }

        let samples = match self.field.sample(positions, selector) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Field '{}' query failed: {}.", self.name, e);
                return SampleBuffer::default();
            }
        };

        if samples.kind != kind {
            warn!(
                "Field '{}' answered {:?} for a {:?} selector; discarding.",
                self.name, samples.kind, kind
            );
            return samples.values.empty_like();
        }

        let values = match (kind.is_grayscale(), samples.values) {
            (true, SampleBuffer::Color(colors)) => {
                debug!(
                    "Field '{}' returned color storage for grayscale data; keeping R.",
                    self.name
                );
                SampleBuffer::Color(colors).into_grayscale().into()
            }
            (false, SampleBuffer::Scalar(_)) => {
                warn!(
                    "Field '{}' returned scalar storage for {:?} data; discarding.",
                    self.name, kind
                );
                SampleBuffer::Color(Vec::new())
            }
            (_, values) => values,
        };

        if values.len() != positions.len() {
            warn!(
                "Field '{}' returned {} samples for {} positions.",
                self.name,
                values.len(),
                positions.len()
            );
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use glam::{DVec3, Vec4};

    use super::*;
    use crate::field::testing::FixedField;
    use crate::field::{FieldSamples, ScalarFnField};

    fn positions(n: usize) -> Vec<Vector3<f64>> {
        (0..n).map(|i| DVec3::splat(i as f64).into()).collect()
    }

    #[test]
    fn classify_follows_declared_type() {
        assert_eq!(FieldAdapter::classify(None), SampleKind::None);
        assert_eq!(
            FieldAdapter::classify(Some(&FieldSelector::float("density"))),
            SampleKind::Scalar
        );
        assert_eq!(
            FieldAdapter::classify(Some(&FieldSelector::normal("normal"))),
            SampleKind::Vector
        );
        assert_eq!(
            FieldAdapter::classify(Some(&FieldSelector::color("albedo"))),
            SampleKind::Color
        );
    }

    #[test]
    fn sample_passes_through_matching_answer() {
        let field = ScalarFnField::new(|p: DVec3| p.x as f32 * 2.0);
        let adapter = FieldAdapter::new("sdf", &field);
        let buf = adapter.sample(&positions(3), None);
        assert_eq!(buf, SampleBuffer::Scalar(vec![0.0, 2.0, 4.0]));
    }

    #[test]
    fn not_ready_field_yields_empty_buffer() {
        let field = FixedField::scalar(vec![1.0, 2.0]);
        field.set_ready(false);
        let adapter = FieldAdapter::new("sdf", &field);
        assert!(adapter.sample(&positions(2), None).is_empty());
    }

    #[test]
    fn failing_query_yields_empty_buffer() {
        let field = ScalarFnField::new(|_| 1.0);
        let adapter = FieldAdapter::new("sdf", &field);
        let buf = adapter.sample(&positions(2), Some(&FieldSelector::color("c")));
        assert!(buf.is_empty());
    }

    #[test]
    fn kind_disagreement_is_discarded() {
        let field = FixedField::new(FieldSamples::new(
            SampleKind::Color,
            SampleBuffer::Color(vec![Vec4::ONE]),
        ));
        let adapter = FieldAdapter::new("meta", &field);
        assert!(adapter
            .sample(&positions(1), Some(&FieldSelector::float("f")))
            .is_empty());
    }

    #[test]
    fn grayscale_in_color_storage_keeps_red() {
        let field = FixedField::new(FieldSamples::new(
            SampleKind::Scalar,
            SampleBuffer::Color(vec![Vec4::new(0.5, 0.0, 0.0, 1.0)]),
        ));
        let adapter = FieldAdapter::new("meta", &field);
        let buf = adapter.sample(&positions(1), Some(&FieldSelector::float("f")));
        assert_eq!(buf, SampleBuffer::Scalar(vec![0.5]));
    }

    #[test]
    fn truncated_answer_is_passed_on() {
        let field = FixedField::scalar(vec![1.0]);
        let adapter = FieldAdapter::new("sdf", &field);
        assert_eq!(adapter.sample(&positions(4), None).len(), 1);
    }
}
