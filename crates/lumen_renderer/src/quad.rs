//! Planar parallelogram primitive, used for walls and area lights.

use crate::{
    gen_f32,
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec2, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Denominators smaller than this count as a ray parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Parallelogram spanned by `u` and `v` from corner `q`.
///
/// One-sided: only rays travelling against `u × v` can hit it.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n · n)` for the unnormalized normal `n = u × v`
    w: Vec3,
    normal: Vec3,
    /// Plane offset along `normal`
    d: f32,
    area: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let n_dot_n = n.dot(n);
        let normal = n.normalize_or_zero();
        let w = if n_dot_n > 0.0 { n / n_dot_n } else { Vec3::ZERO };

        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    /// Plane parameter and (alpha, beta) coordinates of the plane hit, for
    /// rays crossing the plane from either side.
    fn plane_hit(&self, ray: &Ray) -> Option<(f32, f32, Vec2)> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }
        Some((t, denom, Vec2::new(alpha, beta)))
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some((t, denom, uv)) = self.plane_hit(ray) else {
            return false;
        };
        // Back face
        if denom > 0.0 {
            return false;
        }
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.uv = uv;
        rec.material = Some(self.material.as_ref());
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Area-to-solid-angle density of a uniform point on the quad. Counts
    /// both faces so it matches [`Quad::random_direction`] from anywhere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new(origin, direction);
        let Some((t, denom, _)) = self.plane_hit(&ray) else {
            return 0.0;
        };
        if t <= 0.001 || self.area <= 0.0 {
            return 0.0;
        }
        let distance_squared = t * t;
        distance_squared / (denom.abs() * self.area)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        (p - origin).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Unit square in the z = 0 plane facing +Z.
    fn unit_quad() -> Quad {
        Quad::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Arc::new(Material::lambertian(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_front_face_hit() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.25, 0.75, 2.0), -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!((rec.uv - Vec2::new(0.25, 0.75)).length() < 1e-5);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_back_face_rejected() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.5, 0.5, -2.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(!quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn test_outside_parallelogram_misses() {
        let quad = unit_quad();
        let mut rec = HitRecord::default();
        for (x, y) in [(1.5, 0.5), (-0.1, 0.5), (0.5, 1.01), (0.5, -3.0)] {
            let ray = Ray::new(Vec3::new(x, y, 1.0), -Vec3::Z);
            assert!(!quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        }
    }

    #[test]
    fn test_parallel_ray_is_miss_not_nan() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(-1.0, 0.5, 0.0), Vec3::X);
        let mut rec = HitRecord::default();

        assert!(!quad.hit(&ray, Interval::UNIVERSE, &mut rec));
        assert!(!rec.t.is_nan());
        assert_eq!(quad.pdf_value(ray.origin, ray.direction), 0.0);
    }

    #[test]
    fn test_planar_box_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert_eq!(bbox.x, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_light_pdf_matches_geometry() {
        let quad = unit_quad();
        // Straight above the center: pdf = d^2 / (cos * area) = 4.
        let origin = Vec3::new(0.5, 0.5, 2.0);
        assert!((quad.pdf_value(origin, -Vec3::Z) - 4.0).abs() < 1e-4);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let dir = quad.random_direction(origin, &mut rng);
            assert!(dir.z < 0.0);
            assert!(quad.pdf_value(origin, dir) > 0.0);
        }
    }
}
