//! Canned scenes.

use crate::{Camera, Color, Hittable, HittableList, Material, Quad, Sphere, Vec3};
use std::sync::Arc;

/// A ready-to-render scene: world with its BVH built, light list, camera.
pub struct Scene {
    pub world: Arc<HittableList>,
    pub lights: Arc<HittableList>,
    pub camera: Camera,
}

struct CornellMaterials {
    red: Arc<Material>,
    white: Arc<Material>,
    green: Arc<Material>,
    light: Arc<Material>,
}

/// The 555-unit Cornell box with Lambertian walls, a ceiling light and a
/// diffuse sphere.
pub fn cornell_box(width: u32, height: u32) -> Scene {
    let materials = CornellMaterials {
        red: Arc::new(Material::lambertian(Color::new(0.65, 0.05, 0.05))),
        white: Arc::new(Material::lambertian(Color::splat(0.73))),
        green: Arc::new(Material::lambertian(Color::new(0.12, 0.45, 0.15))),
        light: Arc::new(Material::diffuse_light(Color::splat(15.0))),
    };
    let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::clone(&materials.white),
    ));
    build_box(width, height, materials, vec![sphere])
}

/// Cornell box with Blinn-Phong walls (`Ns = 2`) and a glossy sphere.
pub fn glossy_cornell_box(width: u32, height: u32) -> Scene {
    let ns = 2.0;
    let materials = CornellMaterials {
        red: Arc::new(Material::blinn_phong(
            ns,
            Color::new(0.6, 0.0, 0.0),
            Color::splat(0.05),
            Color::ZERO,
        )),
        white: Arc::new(Material::blinn_phong(
            ns,
            Color::splat(0.23),
            Color::splat(0.5),
            Color::ZERO,
        )),
        green: Arc::new(Material::blinn_phong(
            ns,
            Color::new(0.02, 0.35, 0.05),
            Color::splat(0.1),
            Color::ZERO,
        )),
        light: Arc::new(Material::blinn_phong(
            ns,
            Color::splat(0.5),
            Color::ZERO,
            Color::splat(15.0),
        )),
    };
    let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(370.0, 100.0, 350.0),
        100.0,
        Arc::new(Material::blinn_phong(
            40.0,
            Color::splat(0.2),
            Color::splat(0.6),
            Color::ZERO,
        )),
    ));
    build_box(width, height, materials, vec![sphere])
}

fn build_box(
    width: u32,
    height: u32,
    m: CornellMaterials,
    contents: Vec<Arc<dyn Hittable>>,
) -> Scene {
    let quad = |q: Vec3, u: Vec3, v: Vec3, material: &Arc<Material>| -> Arc<dyn Hittable> {
        Arc::new(Quad::new(q, u, v, Arc::clone(material)))
    };

    let light = quad(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        &m.light,
    );

    let mut world = HittableList::new();
    // Every wall faces into the box.
    world.add(quad(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 555.0, 0.0),
        &m.green,
    ));
    world.add(quad(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        &m.red,
    ));
    world.add(quad(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        &m.white,
    ));
    world.add(quad(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        &m.white,
    ));
    world.add(quad(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        &m.white,
    ));
    world.add(Arc::clone(&light));
    for object in contents {
        world.add(object);
    }
    world.build_bvh();

    let mut lights = HittableList::new();
    lights.add(light);

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_vfov(40.0)
        .initialized();

    Scene {
        world: Arc::new(world),
        lights: Arc::new(lights),
        camera,
    }
}
