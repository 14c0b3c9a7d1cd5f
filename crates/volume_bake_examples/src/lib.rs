#![forbid(unsafe_code)]

mod fields;
mod rendering;

pub use fields::{demo_fields, GradientColorField, SphereNormalField, SphereSdf, ValueNoiseField};
pub use rendering::{init_tracing, save_memory_texture_png, save_texture_png, texel_to_rgba8};
