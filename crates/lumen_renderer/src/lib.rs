//! Lumen renderer - CPU Monte Carlo path tracing.
//!
//! Scenes are built from [`Hittable`] primitives carrying a [`Material`],
//! optionally accelerated by a [`BvhNode`]. The [`Renderer`] fans pixels out
//! across a fixed [`ThreadPool`] and each pixel task runs the recursive
//! [`radiance`] estimator with its own seeded RNG.

mod bvh;
mod camera;
mod config;
mod error;
mod film;
mod hittable;
mod integrator;
mod material;
mod quad;
mod renderer;
mod sampler;
pub mod scenes;
mod sphere;
mod texture;
mod thread_pool;

pub use bvh::BvhNode;
pub use camera::{Camera, RaySource};
pub use config::RenderConfig;
pub use error::{ConfigError, RenderError, TaskError};
pub use film::{linear_to_gamma, Image};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::radiance;
pub use material::Material;
pub use quad::Quad;
pub use renderer::{pixel_seed, render_pixel, RenderStats, Renderer};
pub use sampler::DirectionSampler;
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, SolidColor, Texture};
pub use thread_pool::{TaskHandle, ThreadPool};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Onb, Ray, Vec2, Vec3, Vec4};

use rand::{Rng, RngCore};

/// Uniform `f32` in `[0, 1)` from a type-erased RNG.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
