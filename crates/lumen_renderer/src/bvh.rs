//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built top-down by median split. The split axis cycles
//! x, y, z with depth; ranges of one or two primitives become leaves.
//! The tree is read-only once built.

use crate::{HitRecord, Hittable, Ray};
use lumen_math::{Aabb, Interval};
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding one or two primitives directly.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    ///
    /// # Panics
    ///
    /// Panics if `objects` is empty.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        assert!(
            !objects.is_empty(),
            "cannot build a BVH over zero primitives"
        );
        let count = objects.len();
        let node = Self::build(objects, 0);
        log::debug!(
            "built BVH over {count} primitives, depth {}",
            node.depth()
        );
        node
    }

    fn build(mut objects: Vec<Arc<dyn Hittable>>, depth: usize) -> Self {
        let n = objects.len();

        if n <= LEAF_MAX_SIZE {
            let bbox = objects.iter().fold(Aabb::EMPTY, |acc, o| {
                Aabb::surrounding(&acc, &o.bounding_box())
            });
            return BvhNode::Leaf { objects, bbox };
        }

        let axis = depth % 3;
        objects.sort_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        // Split at midpoint
        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects, depth + 1);
        let right = Self::build(right_objects, depth + 1);
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Number of levels, a lone leaf being depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Total number of primitives stored in the leaves.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    if obj.hit(ray, Interval::new(ray_t.min, closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, HittableList, Material, Quad, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<Material> {
        Arc::new(Material::lambertian(Color::splat(0.5)))
    }

    fn random_vec(rng: &mut StdRng, lo: f32, hi: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(lo..hi),
            rng.gen_range(lo..hi),
            rng.gen_range(lo..hi),
        )
    }

    /// Random spheres and quads, each with its own material so hits can be
    /// told apart by material identity.
    fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Hittable>> {
        (0..count)
            .map(|_| {
                let material = Arc::new(Material::lambertian(Color::splat(rng.gen())));
                if rng.gen_bool(0.5) {
                    Arc::new(Sphere::new(
                        random_vec(rng, -10.0, 10.0),
                        rng.gen_range(0.1..2.0),
                        material,
                    )) as Arc<dyn Hittable>
                } else {
                    Arc::new(Quad::new(
                        random_vec(rng, -10.0, 10.0),
                        random_vec(rng, -3.0, 3.0),
                        random_vec(rng, -3.0, 3.0),
                        material,
                    )) as Arc<dyn Hittable>
                }
            })
            .collect()
    }

    fn check_bounds(node: &BvhNode) {
        if let BvhNode::Branch { left, right, bbox } = node {
            assert!(bbox.contains_box(&left.bounding_box()));
            assert!(bbox.contains_box(&right.bounding_box()));
            check_bounds(left);
            check_bounds(right);
        }
    }

    #[test]
    #[should_panic(expected = "zero primitives")]
    fn test_bvh_empty_panics() {
        BvhNode::new(vec![]);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere: Arc<dyn Hittable> =
            Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()));
        let bvh = BvhNode::new(vec![sphere]);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_leaves_hold_one_or_two() {
        fn walk(node: &BvhNode) {
            match node {
                BvhNode::Leaf { objects, .. } => assert!((1..=2).contains(&objects.len())),
                BvhNode::Branch { left, right, .. } => {
                    walk(left);
                    walk(right);
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(7);
        for count in [1, 2, 3, 5, 17, 64] {
            let bvh = BvhNode::new(random_scene(&mut rng, count));
            assert_eq!(bvh.primitive_count(), count);
            walk(&bvh);
        }
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, grey()))
                    as Arc<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);

        // Ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_parent_box_contains_children() {
        let mut rng = StdRng::seed_from_u64(11);
        let bvh = BvhNode::new(random_scene(&mut rng, 200));
        check_bounds(&bvh);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(1234);

        for _scene in 0..20 {
            let count = rng.gen_range(1..60);
            let mut list = HittableList::new();
            for object in random_scene(&mut rng, count) {
                list.add(object);
            }
            let bvh = BvhNode::new(list.objects().to_vec());

            for _ray in 0..300 {
                let origin = random_vec(&mut rng, -15.0, 15.0);
                let target = random_vec(&mut rng, -10.0, 10.0);
                let ray = Ray::new(origin, target - origin);
                let t_max = if rng.gen_bool(0.2) {
                    rng.gen_range(1.0..20.0)
                } else {
                    f32::INFINITY
                };
                let ray_t = Interval::new(0.001, t_max);

                let mut expected = HitRecord::default();
                let mut actual = HitRecord::default();
                let hit_linear = list.hit_linear(&ray, ray_t, &mut expected);
                let hit_bvh = bvh.hit(&ray, ray_t, &mut actual);

                assert_eq!(hit_linear, hit_bvh, "ray {ray:?}");
                if hit_linear {
                    assert!((expected.t - actual.t).abs() < 1e-4, "ray {ray:?}");
                    let same_material = match (expected.material, actual.material) {
                        (Some(a), Some(b)) => std::ptr::eq(a, b),
                        _ => false,
                    };
                    assert!(same_material, "ray {ray:?}");
                }
            }
        }
    }

    #[test]
    fn test_interval_upper_bound_prunes() {
        let near: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, grey()));
        let far: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -8.0), 0.5, grey()));
        let filler: Vec<Arc<dyn Hittable>> = (0..6)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(10.0 + i as f32, 0.0, 0.0), 0.5, grey()))
                    as Arc<dyn Hittable>
            })
            .collect();
        let mut objects = vec![far, near];
        objects.extend(filler);
        let bvh = BvhNode::new(objects);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.5).abs() < 1e-4);

        // Nothing closer than an already-found hit at t = 2.0.
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, 2.0), &mut rec));
    }
}
