//! Signed distance functions and the scene distance field.

use glam::Vec3;

use crate::math::smooth_min;
use crate::scene::{NodeId, ObjectId, Scene, Shape};

/// Nearest surface distance at a point and the top-level object it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDistance {
    pub distance: f32,
    pub id: ObjectId,
}

impl SceneDistance {
    pub const NONE: SceneDistance = SceneDistance {
        distance: f32::INFINITY,
        id: ObjectId::BACKGROUND,
    };
}

/// Sphere of `radius` centred at the origin.
#[inline]
pub fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

/// Box with half extents `half`, edges rounded by `radius`, centred at the origin.
#[inline]
pub fn sd_round_box(p: Vec3, half: Vec3, radius: f32) -> f32 {
    let q = p.abs() - half;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0) - radius
}

/// Horizontal plane at height `y`.
#[inline]
pub fn sd_plane(p: Vec3, y: f32) -> f32 {
    p.y - y
}

/// Distance from `p` to the object stored at `node`, recursing into blends.
pub fn node_distance(scene: &Scene, node: NodeId, p: Vec3) -> f32 {
    let object = scene.node(node);
    match object.shape {
        Shape::Sphere { radius } => sd_sphere(p - object.point, radius),
        Shape::Box {
            half_extents,
            corner_radius,
        } => sd_round_box(p - object.point, half_extents, corner_radius),
        Shape::Plane { y } => sd_plane(p, y),
        Shape::SmoothUnion {
            left,
            right,
            smoothness,
        } => smooth_min(
            node_distance(scene, left, p),
            node_distance(scene, right, p),
            smoothness,
        ),
    }
}

/// Evaluates the scene distance field at `p`.
///
/// Ties go to the earliest-listed object. An empty scene yields
/// [`SceneDistance::NONE`].
pub fn evaluate(scene: &Scene, p: Vec3) -> SceneDistance {
    scene
        .roots()
        .iter()
        .enumerate()
        .fold(SceneDistance::NONE, |nearest, (index, &node)| {
            let distance = node_distance(scene, node, p);
            if distance < nearest.distance {
                SceneDistance {
                    distance,
                    id: ObjectId::from_index(index),
                }
            } else {
                nearest
            }
        })
}
