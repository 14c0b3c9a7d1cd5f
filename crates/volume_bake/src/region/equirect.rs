//! Equirectangular sphere region: a fixed-radius latitude/longitude 2D grid.
use std::f64::consts::{PI, TAU};

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::region::grid::{edge_inclusive, GridResolution};
use crate::region::{check_finite_vec, check_non_negative, spherical_point, RegionSampling};

/// Sphere surface unwrapped onto a 2D texture, longitude along X and latitude along Y.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EquirectSphereRegion {
    pub center: DVec3,
    pub radius: f64,
}

impl EquirectSphereRegion {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn validate(&self) -> Result<()> {
        check_finite_vec("sphere center", self.center)?;
        check_non_negative("sphere radius", self.radius)
    }

    /// Position at normalized texture coordinates `(u, v)`.
    #[inline]
    pub fn position_at(&self, u: f64, v: f64) -> DVec3 {
        spherical_point(self.center, self.radius, u * TAU - PI, v)
    }
}

impl RegionSampling for EquirectSphereRegion {
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, _z: u32) -> DVec3 {
        self.position_at(
            edge_inclusive(x, resolution.width()),
            edge_inclusive(y, resolution.height()),
        )
    }
}
