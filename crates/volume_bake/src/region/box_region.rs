//! Axis-aligned box region sampled with cell-center coordinates on all three axes.
use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::region::grid::{cell_center, GridResolution};
use crate::region::{check_finite_vec, check_non_negative, RegionSampling};

/// Axis-aligned box given by its center and half-extent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BoxRegion {
    /// World-space center.
    pub center: DVec3,
    /// Half-extent along each axis.
    pub extent: DVec3,
}

impl BoxRegion {
    pub fn new(center: DVec3, extent: DVec3) -> Self {
        Self { center, extent }
    }

    pub fn min(&self) -> DVec3 {
        self.center - self.extent
    }

    pub fn max(&self) -> DVec3 {
        self.center + self.extent
    }

    pub fn validate(&self) -> Result<()> {
        check_finite_vec("box center", self.center)?;
        check_non_negative("box extent x", self.extent.x)?;
        check_non_negative("box extent y", self.extent.y)?;
        check_non_negative("box extent z", self.extent.z)
    }
}

impl RegionSampling for BoxRegion {
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, z: u32) -> DVec3 {
        let uvw = DVec3::new(
            cell_center(x, resolution.width()),
            cell_center(y, resolution.height()),
            cell_center(z, resolution.depth()),
        );
        let min = self.min();
        min + (self.max() - min) * uvw
    }
}
