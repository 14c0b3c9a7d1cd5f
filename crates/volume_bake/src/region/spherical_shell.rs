//! Spherical shell region: longitude on X, colatitude on Y, radius on Z.
//!
//! All three axes use edge-inclusive coordinates so the first and last radial slices sit
//! exactly on the inner and outer radius, and the first and last rows sit on the poles.
use std::f64::consts::TAU;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::region::grid::{edge_inclusive, GridResolution};
use crate::region::{check_finite_vec, check_non_negative, spherical_point, RegionSampling};

/// Shell between two concentric spheres, e.g. a planet surface and the top of its atmosphere.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SphericalShellRegion {
    pub center: DVec3,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl SphericalShellRegion {
    pub fn new(center: DVec3, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
        }
    }

    /// Radius of the radial slice at normalized depth `w`.
    #[inline]
    pub fn radius_at(&self, w: f64) -> f64 {
        if w >= 1.0 {
            return self.outer_radius;
        }
        self.inner_radius + (self.outer_radius - self.inner_radius) * w
    }

    pub fn validate(&self) -> Result<()> {
        check_finite_vec("shell center", self.center)?;
        check_non_negative("inner radius", self.inner_radius)?;
        check_non_negative("outer radius", self.outer_radius)?;
        if self.inner_radius > self.outer_radius {
            return Err(Error::InvalidRegion(format!(
                "inner radius {} exceeds outer radius {}",
                self.inner_radius, self.outer_radius
            )));
        }
        Ok(())
    }
}

impl RegionSampling for SphericalShellRegion {
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, z: u32) -> DVec3 {
        let u = edge_inclusive(x, resolution.width());
        let v = edge_inclusive(y, resolution.height());
        let w = edge_inclusive(z, resolution.depth());
        spherical_point(self.center, self.radius_at(w), u * TAU, v)
    }
}
