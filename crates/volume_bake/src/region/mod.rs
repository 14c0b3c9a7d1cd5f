//! Region sampling: turn a parametric region and a grid resolution into world-space positions.
//!
//! Every shape enumerates cells in the same order, X fastest, then Y, then Z, so the
//! position at index `x + y * width + z * width * height` belongs to texel `(x, y, z)`.
//! Downstream stages rely on that order without re-deriving it.
use glam::DVec3;
use mint::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod box_region;
pub mod equirect;
pub mod grid;
pub mod planar_slab;
pub mod spherical_shell;

pub use box_region::BoxRegion;
pub use equirect::EquirectSphereRegion;
pub use grid::{cell_center, edge_inclusive, GridLimits, GridResolution};
pub use planar_slab::PlanarSlabRegion;
pub use spherical_shell::SphericalShellRegion;

/// Trait for region shapes that place one sample per grid cell.
pub trait RegionSampling: Send + Sync {
    /// World position of cell `(x, y, z)`.
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, z: u32) -> DVec3;

    /// All cell positions in enumeration order.
    fn generate(&self, resolution: &GridResolution) -> Vec<Vector3<f64>> {
        let mut out = Vec::with_capacity(resolution.cell_count());
        grid::for_each_cell(resolution, |x, y, z| {
            out.push(self.position(resolution, x, y, z).into());
        });
        out
    }
}

/// The region a bake samples.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum RegionDescriptor {
    Box(BoxRegion),
    SphericalShell(SphericalShellRegion),
    EquirectangularSphere(EquirectSphereRegion),
    PlanarSlab(PlanarSlabRegion),
}

impl RegionDescriptor {
    pub fn boxed(center: DVec3, extent: DVec3) -> Self {
        Self::Box(BoxRegion::new(center, extent))
    }

    pub fn spherical_shell(center: DVec3, inner_radius: f64, outer_radius: f64) -> Self {
        Self::SphericalShell(SphericalShellRegion::new(center, inner_radius, outer_radius))
    }

    pub fn equirectangular_sphere(center: DVec3, radius: f64) -> Self {
        Self::EquirectangularSphere(EquirectSphereRegion::new(center, radius))
    }

    pub fn planar_slab(center: DVec3, size: glam::DVec2, sample_height: f64) -> Self {
        Self::PlanarSlab(PlanarSlabRegion::new(center, size, sample_height))
    }

    /// Short shape name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::SphericalShell(_) => "spherical_shell",
            Self::EquirectangularSphere(_) => "equirectangular_sphere",
            Self::PlanarSlab(_) => "planar_slab",
        }
    }

    fn sampler(&self) -> &dyn RegionSampling {
        match self {
            Self::Box(r) => r,
            Self::SphericalShell(r) => r,
            Self::EquirectangularSphere(r) => r,
            Self::PlanarSlab(r) => r,
        }
    }

    /// Checks shape invariants and that the shape supports `resolution`.
    pub fn validate(&self, resolution: &GridResolution) -> Result<()> {
        match self {
            Self::Box(r) => r.validate(),
            Self::SphericalShell(r) => r.validate(),
            Self::EquirectangularSphere(r) => {
                require_planar(self.name(), resolution)?;
                r.validate()
            }
            Self::PlanarSlab(r) => {
                require_planar(self.name(), resolution)?;
                r.validate()
            }
        }
    }

    /// Validates, then returns one position per cell in enumeration order.
    pub fn generate_positions(&self, resolution: &GridResolution) -> Result<Vec<Vector3<f64>>> {
        self.validate(resolution)?;
        Ok(self.sampler().generate(resolution))
    }
}

impl RegionSampling for RegionDescriptor {
    fn position(&self, resolution: &GridResolution, x: u32, y: u32, z: u32) -> DVec3 {
        self.sampler().position(resolution, x, y, z)
    }

    fn generate(&self, resolution: &GridResolution) -> Vec<Vector3<f64>> {
        self.sampler().generate(resolution)
    }
}

fn require_planar(shape: &str, resolution: &GridResolution) -> Result<()> {
    if resolution.is_volume() {
        return Err(Error::InvalidRegion(format!(
            "{shape} samples a 2D grid, got {resolution}"
        )));
    }
    Ok(())
}

pub(crate) fn check_finite_vec(name: &str, v: DVec3) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::InvalidRegion(format!("{name} must be finite, got {v}")));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidRegion(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

/// `(sin, cos)` of `t * PI`, exact at the poles `t = 0` and `t = 1`.
#[inline]
pub(crate) fn polar_sin_cos(t: f64) -> (f64, f64) {
    if t <= 0.0 {
        (0.0, 1.0)
    } else if t >= 1.0 {
        (0.0, -1.0)
    } else {
        (t * std::f64::consts::PI).sin_cos()
    }
}

/// Point on a sphere of `radius` around `center` at longitude `lon` and colatitude
/// `t * PI`.
#[inline]
pub(crate) fn spherical_point(center: DVec3, radius: f64, lon: f64, t: f64) -> DVec3 {
    let (sin_lat, cos_lat) = polar_sin_cos(t);
    let (sin_lon, cos_lon) = lon.sin_cos();
    center + radius * DVec3::new(sin_lat * cos_lon, sin_lat * sin_lon, cos_lat)
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    #[test]
    fn every_shape_yields_one_position_per_cell() {
        let cases = [
            (
                RegionDescriptor::boxed(DVec3::ZERO, DVec3::splat(1.0)),
                GridResolution::volume(3, 4, 5),
            ),
            (
                RegionDescriptor::spherical_shell(DVec3::ZERO, 1.0, 2.0),
                GridResolution::volume(6, 3, 2),
            ),
            (
                RegionDescriptor::equirectangular_sphere(DVec3::ZERO, 5.0),
                GridResolution::planar(8, 4),
            ),
            (
                RegionDescriptor::planar_slab(DVec3::ZERO, DVec2::splat(10.0), 0.0),
                GridResolution::planar(7, 3),
            ),
        ];
        for (region, res) in cases {
            let positions = region.generate_positions(&res).expect("valid region");
            assert_eq!(positions.len(), res.cell_count(), "{}", region.name());
        }
    }

    #[test]
    fn planar_only_shapes_reject_volume_resolutions() {
        let res = GridResolution::volume(4, 4, 4);
        let slab = RegionDescriptor::planar_slab(DVec3::ZERO, DVec2::ONE, 0.0);
        let sphere = RegionDescriptor::equirectangular_sphere(DVec3::ZERO, 1.0);
        assert!(matches!(
            slab.generate_positions(&res),
            Err(Error::InvalidRegion(_))
        ));
        assert!(matches!(
            sphere.generate_positions(&res),
            Err(Error::InvalidRegion(_))
        ));
    }

    #[test]
    fn descriptor_position_matches_generate_order() {
        let region = RegionDescriptor::boxed(DVec3::new(1.0, 2.0, 3.0), DVec3::splat(4.0));
        let res = GridResolution::volume(3, 2, 2);
        let positions = region.generate(&res);
        let idx = res.cell_index(2, 1, 1);
        assert_eq!(DVec3::from(positions[idx]), region.position(&res, 2, 1, 1));
    }

    #[test]
    fn polar_endpoints_are_exact() {
        assert_eq!(polar_sin_cos(0.0), (0.0, 1.0));
        assert_eq!(polar_sin_cos(1.0), (0.0, -1.0));
        let (s, c) = polar_sin_cos(0.5);
        assert!((s - 1.0).abs() < 1e-12);
        assert!(c.abs() < 1e-12);
    }
}
