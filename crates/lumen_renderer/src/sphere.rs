//! Sphere primitive for ray tracing.

use crate::{
    gen_f32,
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Onb, Vec2, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = p.y.clamp(-1.0, 1.0).acos();
        let phi = p.z.atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return false;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = if self.radius > 0.0 {
            (rec.p - self.center) / self.radius
        } else {
            -ray.direction
        };
        rec.set_face_normal(ray, outward_normal);
        rec.uv = Self::get_sphere_uv(outward_normal);
        rec.material = Some(self.material.as_ref());

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Uniform over the cone of directions subtended by the sphere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let mut rec = HitRecord::default();
        let ray = Ray::new(origin, direction);
        if !self.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec) {
            return 0.0;
        }

        let dist_squared = (self.center - origin).length_squared();
        let r2 = self.radius * self.radius;
        if dist_squared <= r2 {
            return 1.0 / (4.0 * PI);
        }
        let cos_theta_max = (1.0 - r2 / dist_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle > 0.0 {
            1.0 / solid_angle
        } else {
            0.0
        }
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let dist_squared = direction.length_squared();
        let r2 = self.radius * self.radius;

        let r1 = gen_f32(rng);
        let r2_sample = gen_f32(rng);
        let phi = 2.0 * PI * r1;

        if dist_squared <= r2 {
            // Inside: every direction reaches the surface.
            let z = 1.0 - 2.0 * r2_sample;
            let r = (1.0 - z * z).max(0.0).sqrt();
            return Vec3::new(r * phi.cos(), r * phi.sin(), z);
        }

        let cos_theta_max = (1.0 - r2 / dist_squared).sqrt();
        let z = 1.0 + r2_sample * (cos_theta_max - 1.0);
        let r = (1.0 - z * z).max(0.0).sqrt();
        let local = Vec3::new(r * phi.cos(), r * phi.sin(), z);
        Onb::new(direction).transform(local).normalize()
    }
}
