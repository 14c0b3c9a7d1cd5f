//! Planar slab region: a horizontal 2D grid at a fixed height.
use glam::{DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::region::grid::{cell_center, GridResolution};
use crate::region::{check_finite_vec, check_non_negative, RegionSampling};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarSlabRegion {
    /// World-space center; `center.z` offsets the sample height.
    pub center: DVec3,
    /// Full size of the slab along X and Y.
    pub size: DVec2,
    /// Height of the sampling plane relative to `center.z`.
    pub sample_height: f64,
}

impl PlanarSlabRegion {
    pub fn new(center: DVec3, size: DVec2, sample_height: f64) -> Self {
        Self {
            center,
            size,
            sample_height,
        }
    }

    /// Lower-left and upper-right corners in the XY plane.
    pub fn bounds(&self) -> (DVec2, DVec2) {
        let half = self.size * 0.5;
        (self.center.truncate() - half, self.center.truncate() + half)
    }

    pub fn validate(&self) -> Result<()> {
        check_finite_vec("slab center", self.center)?;
        check_non_negative("slab size x", self.size.x)?;
        check_non_negative("slab size y", self.size.y)?;
        if !self.sample_height.is_finite() {
            return Err(Error::InvalidRegion(format!(
                "sample height must be finite, got {}",
                self.sample_height
            )));
        }
        Ok(())
    }
}

impl RegionSampling for PlanarSlabRegion {
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, _z: u32) -> DVec3 {
        let (min, max) = self.bounds();
        let uv = DVec2::new(
            cell_center(x, resolution.width()),
            cell_center(y, resolution.height()),
        );
        let xy = min + (max - min) * uv;
        xy.extend(self.sample_height + self.center.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid_uses_cell_centers() {
        let slab = PlanarSlabRegion::new(DVec3::ZERO, DVec2::new(100.0, 100.0), 0.0);
        let res = GridResolution::planar(2, 2);
        let positions: Vec<DVec3> = slab.generate(&res).into_iter().map(DVec3::from).collect();
        assert_eq!(
            positions,
            vec![
                DVec3::new(-25.0, -25.0, 0.0),
                DVec3::new(25.0, -25.0, 0.0),
                DVec3::new(-25.0, 25.0, 0.0),
                DVec3::new(25.0, 25.0, 0.0),
            ]
        );
    }

    #[test]
    fn height_is_offset_by_center_z() {
        let slab = PlanarSlabRegion::new(DVec3::new(5.0, 5.0, 100.0), DVec2::splat(10.0), 25.0);
        let res = GridResolution::planar(4, 4);
        for p in slab.generate(&res).into_iter().map(DVec3::from) {
            assert_eq!(p.z, 125.0);
            let (min, max) = slab.bounds();
            assert!(p.x > min.x && p.x < max.x);
            assert!(p.y > min.y && p.y < max.y);
        }
    }

    #[test]
    fn single_column_slab_samples_its_min_edge() {
        let slab = PlanarSlabRegion::new(DVec3::ZERO, DVec2::splat(100.0), 0.0);
        let res = GridResolution::planar(1, 2);
        let positions: Vec<DVec3> = slab.generate(&res).into_iter().map(DVec3::from).collect();
        assert_eq!(
            positions,
            vec![DVec3::new(-50.0, -25.0, 0.0), DVec3::new(-50.0, 25.0, 0.0)]
        );
    }

    #[test]
    fn validate_rejects_bad_sizes() {
        assert!(PlanarSlabRegion::new(DVec3::ZERO, DVec2::new(-1.0, 1.0), 0.0)
            .validate()
            .is_err());
        assert!(PlanarSlabRegion::new(DVec3::ZERO, DVec2::ONE, f64::INFINITY)
            .validate()
            .is_err());
        assert!(PlanarSlabRegion::new(DVec3::ZERO, DVec2::ZERO, 0.0)
            .validate()
            .is_ok());
    }
}
