//! Surface materials: emission and BRDF evaluation.
//!
//! Materials only evaluate. Directions are drawn by the
//! [`DirectionSampler`] a material hands out, which may only approximate
//! the BRDF, so callers always divide by the sampler's own PDF.

use crate::{Color, DirectionSampler, SolidColor, Texture, Vec2, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// The closed set of surface models.
#[derive(Clone)]
pub enum Material {
    /// Ideal diffuse reflector, optionally emissive.
    Lambertian {
        albedo: Arc<dyn Texture>,
        emission: Arc<dyn Texture>,
    },
    /// Diffuse plus normalized Blinn-Phong specular lobe, with `.mtl`-style
    /// `Ns`, `Ka`, `Kd`, `Ks` and `Ke` terms.
    BlinnPhong {
        shininess: f32,
        ambient: Arc<dyn Texture>,
        diffuse: Arc<dyn Texture>,
        specular: Arc<dyn Texture>,
        emission: Arc<dyn Texture>,
    },
}

fn solid(color: Color) -> Arc<dyn Texture> {
    Arc::new(SolidColor(color))
}

impl Material {
    /// Non-emissive diffuse material with a constant albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian {
            albedo: solid(albedo),
            emission: solid(Color::ZERO),
        }
    }

    /// Black diffuse surface that emits `radiance`.
    pub fn diffuse_light(radiance: Color) -> Self {
        Material::Lambertian {
            albedo: solid(Color::ZERO),
            emission: solid(radiance),
        }
    }

    pub fn textured_lambertian(albedo: Arc<dyn Texture>) -> Self {
        Material::Lambertian {
            albedo,
            emission: solid(Color::ZERO),
        }
    }

    /// Blinn-Phong material from constant colors.
    pub fn blinn_phong(
        shininess: f32,
        diffuse: Color,
        specular: Color,
        emission: Color,
    ) -> Self {
        Material::BlinnPhong {
            shininess,
            ambient: solid(Color::ZERO),
            diffuse: solid(diffuse),
            specular: solid(specular),
            emission: solid(emission),
        }
    }

    /// Radiance emitted toward `wo`.
    pub fn emission(&self, uv: Vec2, _normal: Vec3, _wo: Vec3) -> Color {
        match self {
            Material::Lambertian { emission, .. } | Material::BlinnPhong { emission, .. } => {
                emission.value(uv, Vec3::ZERO)
            }
        }
    }

    /// Ambient term. Carried for scene descriptions; light transport
    /// ignores it.
    pub fn ambient(&self, uv: Vec2) -> Color {
        match self {
            Material::Lambertian { .. } => Color::ZERO,
            Material::BlinnPhong { ambient, .. } => ambient.value(uv, Vec3::ZERO),
        }
    }

    pub fn is_emissive(&self, uv: Vec2) -> bool {
        self.emission(uv, Vec3::Z, Vec3::Z).max_element() > 0.0
    }

    /// BRDF for light arriving along `wi` and leaving along `wo`, both
    /// pointing away from the surface.
    pub fn brdf(&self, uv: Vec2, normal: Vec3, wi: Vec3, wo: Vec3) -> Color {
        match self {
            Material::Lambertian { albedo, .. } => albedo.value(uv, Vec3::ZERO) / PI,
            Material::BlinnPhong {
                shininess,
                diffuse,
                specular,
                ..
            } => {
                let kd = diffuse.value(uv, Vec3::ZERO);
                let ks = specular.value(uv, Vec3::ZERO);
                let half = (wi + wo).normalize_or_zero();
                let cos_h = normal.dot(half).max(0.0);
                let lobe = (shininess + 2.0) / (2.0 * PI) * cos_h.powf(*shininess);
                kd / PI + ks * lobe
            }
        }
    }

    /// Importance sampler matching this material at `uv`.
    ///
    /// Blinn-Phong mixes the cosine and specular samplers in proportion to
    /// the magnitudes of `Kd` and `Ks` at the hit.
    pub fn sampler(&self, uv: Vec2) -> DirectionSampler<'static> {
        match self {
            Material::Lambertian { .. } => DirectionSampler::CosineHemisphere,
            Material::BlinnPhong {
                shininess,
                diffuse,
                specular,
                ..
            } => {
                let kd = diffuse.value(uv, Vec3::ZERO).length();
                let ks = specular.value(uv, Vec3::ZERO).length();
                if ks <= 0.0 {
                    return DirectionSampler::CosineHemisphere;
                }
                if kd <= 0.0 {
                    return DirectionSampler::BlinnPhongSpecular {
                        shininess: *shininess,
                    };
                }
                DirectionSampler::mixture(
                    vec![
                        DirectionSampler::CosineHemisphere,
                        DirectionSampler::BlinnPhongSpecular {
                            shininess: *shininess,
                        },
                    ],
                    vec![kd, ks],
                )
            }
        }
    }
}
