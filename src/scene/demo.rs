use glam::Vec3;
use log::debug;

use super::{Light, Material, ObjectDescription, Scene};
use crate::camera::Camera;

const FLOOR: usize = 0;
const RED_GLOSS: usize = 1;
const BLUE_MATTE: usize = 2;
const GOLD: usize = 3;

/// Built-in scene used when no description file is given: a floor, a
/// rounded box, a lone sphere and two spheres blended into one object.
pub fn create_demo_scene() -> Scene {
    debug!("Generating demo scene...");

    let camera = Camera::from_degrees(Vec3::new(0.0, 1.5, -4.0), Vec3::new(0.0, -0.25, 1.0), 70.0)
        .unwrap_or_default();

    let scene = Scene::builder()
        .material(Material {
            shininess: 4.0,
            diffuse: Vec3::splat(0.6),
            specular: Vec3::splat(0.05),
            ambient: Vec3::splat(0.6),
        })
        .material(Material {
            shininess: 64.0,
            diffuse: Vec3::new(0.9, 0.15, 0.1),
            specular: Vec3::splat(1.2),
            ambient: Vec3::new(0.9, 0.15, 0.1),
        })
        .material(Material {
            shininess: 8.0,
            diffuse: Vec3::new(0.15, 0.3, 0.9),
            specular: Vec3::splat(0.3),
            ambient: Vec3::new(0.15, 0.3, 0.9),
        })
        .material(Material {
            shininess: 24.0,
            diffuse: Vec3::new(1.0, 0.75, 0.3),
            specular: Vec3::new(1.0, 0.9, 0.6),
            ambient: Vec3::new(1.0, 0.75, 0.3),
        })
        .ambient(Vec3::splat(0.12))
        .light(Light {
            point: Vec3::new(-4.0, 6.0, -3.0),
            diffuse_intensity: Vec3::splat(0.9),
            specular_intensity: Vec3::splat(0.8),
        })
        .light(Light {
            point: Vec3::new(5.0, 3.0, 1.0),
            diffuse_intensity: Vec3::new(0.3, 0.3, 0.45),
            specular_intensity: Vec3::splat(0.2),
        })
        .camera(camera)
        .object(ObjectDescription::plane(-1.0, FLOOR))
        .object(ObjectDescription::sphere(Vec3::new(-1.6, 0.0, 2.0), 1.0, RED_GLOSS))
        .object(ObjectDescription::rounded_box(
            Vec3::new(1.7, -0.4, 2.5),
            Vec3::new(0.6, 0.6, 0.6),
            0.1,
            BLUE_MATTE,
        ))
        .object(ObjectDescription::smooth_union(
            ObjectDescription::sphere(Vec3::new(-0.2, 0.4, 4.5), 0.8, GOLD),
            ObjectDescription::sphere(Vec3::new(0.7, 0.9, 4.8), 0.6, GOLD),
            0.5,
            GOLD,
        ))
        .build();

    debug!("Demo scene created: {} top-level objects", scene.object_count());
    scene
}
