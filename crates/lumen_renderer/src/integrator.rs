//! Recursive Monte Carlo radiance estimator.
//!
//! Each vertex adds its emission plus one sampled continuation
//! `Li * f * cos θ / pdf`. The first `min_bounces` vertices always continue;
//! past that, Russian roulette stops the path with `stop_probability` and
//! survivors are scaled by `1 / (1 - stop_probability)`. There is no hard
//! depth cap, so the estimator stays unbiased and termination is purely
//! probabilistic.

use crate::{gen_f32, Color, DirectionSampler, HitRecord, Hittable, HittableList, RenderConfig};
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Upper bound on the light share of the sampling mixture. The material lobe
/// keeps the rest, so every direction it can reach has non-zero pdf.
const MAX_LIGHT_SAMPLING_WEIGHT: f32 = 0.99;

/// Radiance arriving along `ray`, estimated with one path.
///
/// `bounce` is the number of vertices already on the path (0 for camera
/// rays). When `lights` is non-empty, directions are drawn from a mixture of
/// the material's sampler and the lights, weighted by
/// `config.light_sampling_weight`.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    lights: &HittableList,
    bounce: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(config.ray_epsilon, f32::INFINITY), &mut rec) {
        return config.background_color();
    }
    let Some(material) = rec.material else {
        return Color::ZERO;
    };

    let wo = -ray.direction;
    let emission = material.emission(rec.uv, rec.normal, wo);

    let mut survival_scale = 1.0;
    if bounce >= config.min_bounces {
        if gen_f32(rng) < config.stop_probability {
            return emission;
        }
        survival_scale = 1.0 / (1.0 - config.stop_probability);
    }

    let material_sampler = material.sampler(rec.uv);
    let sampler = match light_weight(lights, config) {
        None => material_sampler,
        Some(w) => DirectionSampler::mixture(
            vec![material_sampler, DirectionSampler::Light(lights)],
            vec![1.0 - w, w],
        ),
    };

    let wi = sampler.sample(&rec, wo, rng);
    let cos_theta = rec.normal.dot(wi);
    if cos_theta <= 0.0 {
        // Below the surface the integrand is zero.
        return emission;
    }
    let pdf = sampler.pdf(&rec, wi, wo);
    if !(pdf > 0.0 && pdf.is_finite()) {
        return emission;
    }

    let brdf = material.brdf(rec.uv, rec.normal, wi, wo);
    let scattered = Ray::new(rec.p, wi);
    let li = radiance(&scattered, world, lights, bounce + 1, config, rng);
    log::trace!("bounce {bounce}: t={} pdf={pdf}", rec.t);

    emission + li * brdf * (cos_theta / pdf * survival_scale)
}

/// Share of sampled directions drawn from `lights`, if any.
fn light_weight(lights: &HittableList, config: &RenderConfig) -> Option<f32> {
    let w = config.light_sampling_weight;
    if lights.is_empty() || !(w > 0.0) {
        return None;
    }
    Some(w.min(MAX_LIGHT_SAMPLING_WEIGHT))
}
