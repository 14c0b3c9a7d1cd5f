//! Analytic fields standing in for a voxel engine.
use glam::{DVec3, Vec4};
use mint::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use volume_bake::prelude::*;

/// Signed distance to a sphere, scaled so the surface is `0` and `radius` away is `+-1`.
pub struct SphereSdf {
    pub center: DVec3,
    pub radius: f64,
}

impl SphereSdf {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn distance(&self, p: DVec3) -> f32 {
        ((p.distance(self.center) - self.radius) / self.radius.max(f64::EPSILON)) as f32
    }
}

impl VolumeField for SphereSdf {
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        ScalarFnField::new(|p: DVec3| self.distance(p)).sample(positions, selector)
    }
}

/// Trilinear value noise over a wrapping lattice of random values in `[-1, 1]`.
pub struct ValueNoiseField {
    lattice: Vec<f32>,
    size: usize,
    /// Lattice cells per world unit.
    pub frequency: f64,
}

impl ValueNoiseField {
    pub fn new(seed: u64, size: usize, frequency: f64) -> Self {
        let size = size.max(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let lattice = (0..size * size * size)
            .map(|_| rng.next_u32() as f32 / u32::MAX as f32 * 2.0 - 1.0)
            .collect();
        Self {
            lattice,
            size,
            frequency,
        }
    }

    fn at(&self, x: i64, y: i64, z: i64) -> f32 {
        let n = self.size as i64;
        let (x, y, z) = (x.rem_euclid(n), y.rem_euclid(n), z.rem_euclid(n));
        self.lattice[(x + y * n + z * n * n) as usize]
    }

    pub fn value(&self, p: DVec3) -> f32 {
        let q = p * self.frequency;
        let base = q.floor();
        let t = (q - base).as_vec3();
        let s = t * t * (3.0 - 2.0 * t);
        let (x, y, z) = (base.x as i64, base.y as i64, base.z as i64);

        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        let c00 = lerp(self.at(x, y, z), self.at(x + 1, y, z), s.x);
        let c10 = lerp(self.at(x, y + 1, z), self.at(x + 1, y + 1, z), s.x);
        let c01 = lerp(self.at(x, y, z + 1), self.at(x + 1, y, z + 1), s.x);
        let c11 = lerp(self.at(x, y + 1, z + 1), self.at(x + 1, y + 1, z + 1), s.x);
        lerp(lerp(c00, c10, s.y), lerp(c01, c11, s.y), s.z)
    }
}

impl VolumeField for ValueNoiseField {
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        ScalarFnField::new(|p: DVec3| self.value(p)).sample(positions, selector)
    }
}

/// Color by height between two tints, in `[-1, 1]` per channel so the default remap applies.
pub struct GradientColorField {
    pub low: Vec4,
    pub high: Vec4,
    /// Height range mapped onto `low..high`.
    pub range: (f64, f64),
}

impl GradientColorField {
    pub fn new(low: Vec4, high: Vec4, range: (f64, f64)) -> Self {
        Self { low, high, range }
    }

    pub fn color(&self, p: DVec3) -> Vec4 {
        let (lo, hi) = self.range;
        let t = ((p.z - lo) / (hi - lo).max(f64::EPSILON)).clamp(0.0, 1.0) as f32;
        self.low.lerp(self.high, t) * 2.0 - Vec4::ONE
    }
}

impl VolumeField for GradientColorField {
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        ColorFnField::new(|p: DVec3| self.color(p)).sample(positions, selector)
    }
}

/// Outward unit normals of a sphere.
pub struct SphereNormalField {
    pub center: DVec3,
}

impl SphereNormalField {
    pub fn new(center: DVec3) -> Self {
        Self { center }
    }
}

impl VolumeField for SphereNormalField {
    fn sample(
        &self,
        positions: &[Vector3<f64>],
        selector: Option<&FieldSelector>,
    ) -> Result<FieldSamples> {
        ColorFnField::new(|p: DVec3| (p - self.center).normalize_or_zero().as_vec3().extend(0.0))
            .sample(positions, selector)
    }
}

/// Registry with every demo field under a fixed name.
pub fn demo_fields() -> FieldRegistry {
    let mut fields = FieldRegistry::new();
    fields.register("sphere", SphereSdf::new(DVec3::ZERO, 400.0));
    fields.register("noise", ValueNoiseField::new(7, 32, 1.0 / 64.0));
    fields.register(
        "gradient",
        GradientColorField::new(
            Vec4::new(0.05, 0.25, 0.1, 1.0),
            Vec4::new(0.95, 0.95, 1.0, 1.0),
            (-500.0, 500.0),
        ),
    );
    fields.register("normals", SphereNormalField::new(DVec3::ZERO));
    fields
}
