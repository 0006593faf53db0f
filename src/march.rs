//! Sphere tracing and soft shadows.

use glam::Vec3;

use crate::scene::{Light, ObjectId, Scene};
use crate::sdf::{evaluate, SceneDistance};

pub const MAX_STEPS: usize = 256;
pub const EPSILON: f32 = 0.001;
pub const MAX_DIST: f32 = 100.0;

pub const SHADOW_STEPS: usize = 128;
/// Penumbra width; larger values give harder shadow edges.
pub const PENUMBRA_WIDTH: f32 = 50.0;

/// Marches from `origin` along unit `direction` to the first surface.
///
/// Returns the travelled distance and the hit object, or
/// [`ObjectId::BACKGROUND`] when the ray escapes past [`MAX_DIST`].
pub fn intersect(scene: &Scene, origin: Vec3, direction: Vec3) -> SceneDistance {
    let mut t = 0.0;
    let mut id = ObjectId::BACKGROUND;

    for _ in 0..MAX_STEPS {
        let step = evaluate(scene, origin + direction * t);
        t += step.distance;
        id = step.id;
        if step.distance < EPSILON || t > MAX_DIST {
            break;
        }
    }

    if t >= MAX_DIST {
        id = ObjectId::BACKGROUND;
    }

    SceneDistance { distance: t, id }
}

/// Distance-ratio soft shadow along `direction`, in `[0, inf)`.
///
/// Tracks the smallest `w * d / t` seen while marching at most `max_steps`
/// steps or `max_dist` units. At `t == 0` the ratio is infinite (or negative
/// infinite when starting inside an occluder, which ends the march fully
/// shadowed).
pub fn soft_shadow(
    scene: &Scene,
    origin: Vec3,
    direction: Vec3,
    max_steps: usize,
    max_dist: f32,
    w: f32,
) -> f32 {
    let mut res = 1.0_f32;
    let mut t = 0.0;

    for _ in 0..max_steps {
        let d = evaluate(scene, origin + direction * t).distance;
        res = res.min(w * d / t);
        t += d;
        if res < -1.0 || t > max_dist {
            break;
        }
    }

    res.max(0.0)
}

/// Light visibility from `point`, in `[0, 1]`.
///
/// The march starts one unit towards the light so the surface under
/// `point` does not shadow itself.
pub fn shadow_factor(scene: &Scene, point: Vec3, light: &Light) -> f32 {
    let to_light = light.point - point;
    let light_dist = to_light.length();
    let direction = to_light / light_dist;

    soft_shadow(
        scene,
        point + direction,
        direction,
        SHADOW_STEPS,
        light_dist,
        PENUMBRA_WIDTH,
    )
    .min(1.0)
}
