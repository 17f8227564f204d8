//! Hittable trait and HitRecord for ray-object intersection.

use crate::{gen_f32, BvhNode, Material, Ray};
use lumen_math::{Aabb, Interval, Vec2, Vec3};
use rand::RngCore;
use std::sync::{Arc, OnceLock};

/// Record of a ray-object intersection.
///
/// A fresh record is in the "no hit" state: `t = +inf` and no material.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Surface coordinates for texture and BRDF lookups
    pub uv: Vec2,
    /// Material at the intersection point
    pub material: Option<&'a Material>,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            material: None,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// Implementations are immutable once built and shared across render threads.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    ///
    /// On a hit, fills `rec` with the earliest intersection and returns true.
    /// On a miss, `rec` is left untouched.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Solid-angle density of [`Hittable::random_direction`] producing
    /// `direction` from `origin`. Objects that are not light samplable
    /// report zero.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// A unit direction from `origin` toward a random point on the object.
    fn random_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// A list of hittable objects.
///
/// The list owns shared handles to its members. [`HittableList::build_bvh`]
/// caches a BVH over the current contents; [`HittableList::add`] and
/// [`HittableList::clear`] discard that cache, and queries fall back to a
/// linear scan until it is built again.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
    bvh: OnceLock<BvhNode>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        if self.bvh.take().is_some() {
            log::debug!("hittable list modified, dropping cached BVH");
        }
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bvh.take();
        self.bbox = Aabb::EMPTY;
    }

    /// Build (once) and return the BVH over the current contents.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn build_bvh(&self) -> &BvhNode {
        self.bvh.get_or_init(|| BvhNode::new(self.objects.clone()))
    }

    pub fn bvh(&self) -> Option<&BvhNode> {
        self.bvh.get()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest hit by brute force, ignoring any cached BVH.
    pub fn hit_linear<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, Interval::new(ray_t.min, closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self.bvh.get() {
            Some(bvh) => bvh.hit(ray, ray_t, rec),
            None => self.hit_linear(ray, ray_t, rec),
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .objects
            .iter()
            .map(|o| o.pdf_value(origin, direction))
            .sum();
        sum / self.objects.len() as f32
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }
        let n = self.objects.len();
        let i = ((gen_f32(rng) * n as f32) as usize).min(n - 1);
        self.objects[i].random_direction(origin, rng)
    }
}
