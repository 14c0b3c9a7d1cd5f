//! Per-cell sample storage shared by the adapter, processor and encoder.
use glam::Vec4;

/// Ordered per-cell values, indexed in region enumeration order.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleBuffer {
    /// One value per cell.
    Scalar(Vec<f32>),
    /// Four channels per cell, `x..w` = R, G, B, A.
    Color(Vec<Vec4>),
}

impl SampleBuffer {
    /// Empty buffer of the same shape.
    pub fn empty_like(&self) -> Self {
        match self {
            Self::Scalar(_) => Self::Scalar(Vec::new()),
            Self::Color(_) => Self::Color(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(v) => v.len(),
            Self::Color(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channels stored per cell.
    pub fn channels(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Color(_) => 4,
        }
    }

    pub fn as_scalar(&self) -> Option<&[f32]> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<&[Vec4]> {
        match self {
            Self::Color(v) => Some(v),
            Self::Scalar(_) => None,
        }
    }

    /// Cell `i` as RGBA; grayscale cells replicate into RGB with opaque alpha.
    #[inline]
    pub fn rgba(&self, i: usize) -> Option<Vec4> {
        match self {
            Self::Scalar(v) => v.get(i).map(|&g| Vec4::new(g, g, g, 1.0)),
            Self::Color(v) => v.get(i).copied(),
        }
    }

    /// Cell `i` as a single value; color cells keep only R.
    #[inline]
    pub fn red(&self, i: usize) -> Option<f32> {
        match self {
            Self::Scalar(v) => v.get(i).copied(),
            Self::Color(v) => v.get(i).map(|c| c.x),
        }
    }

    /// Collapses color storage to its R channel.
    pub fn into_grayscale(self) -> Vec<f32> {
        match self {
            Self::Scalar(v) => v,
            Self::Color(v) => v.into_iter().map(|c| c.x).collect(),
        }
    }
}

impl From<Vec<f32>> for SampleBuffer {
    fn from(value: Vec<f32>) -> Self {
        SampleBuffer::Scalar(value)
    }
}

impl From<Vec<Vec4>> for SampleBuffer {
    fn from(value: Vec<Vec4>) -> Self {
        SampleBuffer::Color(value)
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::Scalar(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_replicates_grayscale() {
        let buf = SampleBuffer::Scalar(vec![0.25]);
        assert_eq!(buf.rgba(0), Some(Vec4::new(0.25, 0.25, 0.25, 1.0)));
        assert_eq!(buf.rgba(1), None);
    }

    #[test]
    fn red_narrows_color() {
        let buf = SampleBuffer::Color(vec![Vec4::new(0.1, 0.2, 0.3, 0.4)]);
        assert_eq!(buf.red(0), Some(0.1));
        assert_eq!(buf.channels(), 4);
        assert_eq!(buf.into_grayscale(), vec![0.1]);
    }

    #[test]
    fn empty_like_keeps_shape() {
        let buf = SampleBuffer::Color(vec![Vec4::ONE; 3]);
        let empty = buf.empty_like();
        assert!(empty.is_empty());
        assert!(empty.as_color().is_some());
        assert!(SampleBuffer::default().as_scalar().is_some());
    }
}
