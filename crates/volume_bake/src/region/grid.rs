//! Grid resolutions and normalized cell coordinates.
//!
//! This module defines [`GridResolution`] (2D or 3D cell counts), the per-axis [`GridLimits`]
//! used to validate them, and the two normalized-coordinate rules shared by all region shapes.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of cells along each axis of a bake target.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridResolution {
    /// 2D target, `width * height` texels.
    Planar { width: u32, height: u32 },
    /// 3D target, `x * y * z` voxels.
    Volume { x: u32, y: u32, z: u32 },
}

impl GridResolution {
    pub fn planar(width: u32, height: u32) -> Self {
        Self::Planar { width, height }
    }

    pub fn volume(x: u32, y: u32, z: u32) -> Self {
        Self::Volume { x, y, z }
    }

    /// Cells along X.
    pub fn width(&self) -> u32 {
        match *self {
            Self::Planar { width, .. } => width,
            Self::Volume { x, .. } => x,
        }
    }

    /// Cells along Y.
    pub fn height(&self) -> u32 {
        match *self {
            Self::Planar { height, .. } => height,
            Self::Volume { y, .. } => y,
        }
    }

    /// Cells along Z; `1` for planar targets.
    pub fn depth(&self) -> u32 {
        match *self {
            Self::Planar { .. } => 1,
            Self::Volume { z, .. } => z,
        }
    }

    pub fn is_volume(&self) -> bool {
        matches!(self, Self::Volume { .. })
    }

    /// Total cell count; sizes every buffer of a bake.
    pub fn cell_count(&self) -> usize {
        self.width() as usize * self.height() as usize * self.depth() as usize
    }

    /// Linear index of a cell, `x + y * width + z * width * height`.
    #[inline]
    pub fn cell_index(&self, x: u32, y: u32, z: u32) -> usize {
        let w = self.width() as usize;
        let h = self.height() as usize;
        x as usize + y as usize * w + z as usize * w * h
    }

    /// Checks every axis against `limits`.
    pub fn validate(&self, limits: &GridLimits) -> Result<()> {
        limits.validate()?;
        let axes: &[(&str, u32)] = match *self {
            Self::Planar { width, height } => &[("width", width), ("height", height)],
            Self::Volume { x, y, z } => &[("x", x), ("y", y), ("z", z)],
        };
        for &(name, value) in axes {
            if !limits.contains(value) {
                return Err(Error::InvalidConfig(format!(
                    "resolution {name} = {value} outside [{}, {}]",
                    limits.min, limits.max
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for GridResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Planar { width, height } => write!(f, "{width}x{height}"),
            Self::Volume { x, y, z } => write!(f, "{x}x{y}x{z}"),
        }
    }
}

/// Inclusive per-axis bounds for a [`GridResolution`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLimits {
    pub min: u32,
    pub max: u32,
}

impl GridLimits {
    /// Narrower range used by interactive editors.
    pub const EDITOR: GridLimits = GridLimits { min: 4, max: 512 };

    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(Error::InvalidConfig("grid limit min must be >= 1".into()));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "grid limit min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for GridLimits {
    fn default() -> Self {
        Self { min: 1, max: 4096 }
    }
}

/// Cell-center coordinate `(index + 0.5) / count` in `(0, 1)`.
///
/// A single-cell axis maps to `0`, like [`edge_inclusive`].
#[inline]
pub fn cell_center(index: u32, count: u32) -> f64 {
    if count <= 1 {
        0.0
    } else {
        (index as f64 + 0.5) / count as f64
    }
}

/// Edge-inclusive coordinate `index / (count - 1)` in `[0, 1]`.
///
/// A single-cell axis maps to `0`.
#[inline]
pub fn edge_inclusive(index: u32, count: u32) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Visits every cell in enumeration order (X fastest, then Y, then Z).
pub(crate) fn for_each_cell(resolution: &GridResolution, mut f: impl FnMut(u32, u32, u32)) {
    for z in 0..resolution.depth() {
        for y in 0..resolution.height() {
            for x in 0..resolution.width() {
                f(x, y, z);
            }
        }
    }
}
