//! Surface normals and Phong lighting.

use glam::Vec3;

use crate::march::shadow_factor;
use crate::math::{clamp, VecExt};
use crate::scene::{ObjectId, Scene};
use crate::sdf::evaluate;

pub const GAMMA: f32 = 2.2;

const TETRAHEDRON: [Vec3; 4] = [
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Field gradient at `p` from four tetrahedral taps.
///
/// The tap offset grows with `hit_distance` so far surfaces keep the same
/// relative precision. A zero offset (hit at the eye) yields the zero vector.
pub fn estimate_normal(scene: &Scene, p: Vec3, hit_distance: f32) -> Vec3 {
    let h = hit_distance / 100.0;
    TETRAHEDRON
        .iter()
        .map(|&k| k * evaluate(scene, p + k * h).distance)
        .sum::<Vec3>()
        .normalize_or_zero()
}

/// Phong colour of `point` on object `id`, seen from `eye`, in `[0, 1]^3`.
///
/// The background id shades with the void material and is always black.
pub fn shade(scene: &Scene, eye: Vec3, point: Vec3, normal: Vec3, id: ObjectId) -> Vec3 {
    if id.is_background() {
        return Vec3::ZERO;
    }

    let material = scene.material_for(id);
    let camera_dir = (eye - point).normalize();

    let lit = scene.lights().iter().fold(Vec3::ZERO, |total, light| {
        let shadow = shadow_factor(scene, point, light);
        let light_dir = (light.point - point).normalize();
        let reflected = normal * (2.0 * light_dir.dot(normal)) - light_dir;

        let diffuse_incidence = clamp(normal.dot(light_dir), 0.0, 1.0);
        let diffuse = light.diffuse_intensity * (shadow * diffuse_incidence) * material.diffuse;

        let specular_incidence =
            diffuse_incidence * clamp(reflected.dot(camera_dir), 0.0, 1.0).powf(material.shininess);
        let specular = light.specular_intensity * (shadow * specular_incidence) * material.specular;

        total + diffuse + specular
    });

    (lit + scene.ambient_color() * material.ambient).clamp_each(0.0, 1.0)
}

/// Encodes a linear colour for display.
#[inline]
pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.pow_each(1.0 / GAMMA)
}
