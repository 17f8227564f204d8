//! Direction samplers for importance sampling.
//!
//! A sampler draws an incoming direction `wi` at a hit and reports the
//! solid-angle density it drew it with. All directions point away from the
//! surface: `wo` toward the viewer, `wi` toward the next vertex.

use crate::{gen_f32, HitRecord, Hittable};
use lumen_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

pub enum DirectionSampler<'a> {
    /// `pdf = cos θ / π`
    CosineHemisphere,
    /// `pdf = 1 / 2π`
    UniformHemisphere,
    /// Half-vector drawn around the normal with density `∝ cos^ns θh`,
    /// `wo` reflected about it.
    BlinnPhongSpecular { shininess: f32 },
    /// Directions toward explicit light geometry.
    Light(&'a dyn Hittable),
    /// Weighted choice of sub-samplers. `weights` are normalized and `cdf`
    /// is their running sum.
    Mixture {
        samplers: Vec<DirectionSampler<'a>>,
        weights: Vec<f32>,
        cdf: Vec<f32>,
    },
}

impl<'a> DirectionSampler<'a> {
    /// Build a mixture drawing sampler `i` with probability proportional to
    /// `weights[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the counts differ, the list is empty, a weight is negative
    /// or not finite, or all weights are zero.
    pub fn mixture(samplers: Vec<DirectionSampler<'a>>, weights: Vec<f32>) -> Self {
        assert_eq!(
            samplers.len(),
            weights.len(),
            "mixture needs one weight per sampler"
        );
        assert!(!samplers.is_empty(), "mixture needs at least one sampler");
        assert!(
            weights.iter().all(|w| w.is_finite() && *w >= 0.0),
            "mixture weights must be finite and non-negative"
        );
        let total: f32 = weights.iter().sum();
        assert!(total > 0.0, "mixture weights must not all be zero");

        let weights: Vec<f32> = weights.iter().map(|w| w / total).collect();
        let mut running = 0.0;
        let mut cdf: Vec<f32> = weights
            .iter()
            .map(|w| {
                running += w;
                running
            })
            .collect();
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        DirectionSampler::Mixture {
            samplers,
            weights,
            cdf,
        }
    }

    /// Draw an incoming direction at `rec` for outgoing direction `wo`.
    pub fn sample(&self, rec: &HitRecord, wo: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            DirectionSampler::CosineHemisphere => {
                Onb::new(rec.normal).transform(random_cosine_direction(rng))
            }
            DirectionSampler::UniformHemisphere => {
                let z = gen_f32(rng);
                let phi = 2.0 * PI * gen_f32(rng);
                let r = (1.0 - z * z).max(0.0).sqrt();
                Onb::new(rec.normal).transform(Vec3::new(r * phi.cos(), r * phi.sin(), z))
            }
            DirectionSampler::BlinnPhongSpecular { shininess } => {
                let cos_theta = gen_f32(rng).powf(1.0 / (shininess + 1.0));
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                let phi = 2.0 * PI * gen_f32(rng);
                let half = Onb::new(rec.normal).transform(Vec3::new(
                    sin_theta * phi.cos(),
                    sin_theta * phi.sin(),
                    cos_theta,
                ));
                2.0 * wo.dot(half) * half - wo
            }
            DirectionSampler::Light(lights) => lights.random_direction(rec.p, rng),
            DirectionSampler::Mixture { samplers, cdf, .. } => {
                let x = gen_f32(rng);
                let i = cdf
                    .iter()
                    .position(|c| x < *c)
                    .unwrap_or(samplers.len() - 1);
                samplers[i].sample(rec, wo, rng)
            }
        }
    }

    /// Solid-angle density of drawing `wi` at `rec` given `wo`.
    pub fn pdf(&self, rec: &HitRecord, wi: Vec3, wo: Vec3) -> f32 {
        match self {
            DirectionSampler::CosineHemisphere => rec.normal.dot(wi).max(0.0) / PI,
            DirectionSampler::UniformHemisphere => {
                if rec.normal.dot(wi) >= 0.0 {
                    1.0 / (2.0 * PI)
                } else {
                    0.0
                }
            }
            DirectionSampler::BlinnPhongSpecular { shininess } => {
                let half = (wi + wo).normalize_or_zero();
                let wo_dot_h = wo.dot(half);
                let cos_h = rec.normal.dot(half);
                if wo_dot_h <= 0.0 || cos_h <= 0.0 {
                    return 0.0;
                }
                (shininess + 1.0) * cos_h.powf(*shininess) / (8.0 * PI * wo_dot_h)
            }
            DirectionSampler::Light(lights) => lights.pdf_value(rec.p, wi),
            DirectionSampler::Mixture {
                samplers, weights, ..
            } => samplers
                .iter()
                .zip(weights)
                .map(|(s, w)| w * s.pdf(rec, wi, wo))
                .sum(),
        }
    }
}

/// Cosine-weighted direction around +Z.
fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).max(0.0).sqrt();
    Vec3::new(x, y, z)
}
