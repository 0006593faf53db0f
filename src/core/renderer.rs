//! Per-pixel pipeline: camera ray, sphere trace, normal, Phong, pack.

use std::sync::Arc;

use glam::Vec3;

use super::scheduler::{FrameParams, RowRenderer};
use super::surface::Surface;
use crate::camera::{view_coord, Camera, ViewBasis};
use crate::march::intersect;
use crate::scene::Scene;
use crate::shading::{estimate_normal, gamma_correct, shade};

/// Renders rows of a shared, immutable scene.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    scene: Arc<Scene>,
}

impl SceneRenderer {
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Linear colour of the pixel seen along unit `direction` from `eye`.
    pub fn trace_pixel(&self, eye: Vec3, direction: Vec3) -> Vec3 {
        let scene = &*self.scene;
        let hit = intersect(scene, eye, direction);
        if hit.id.is_background() {
            return Vec3::ZERO;
        }

        let point = eye + direction * hit.distance;
        let normal = estimate_normal(scene, point, hit.distance);
        shade(scene, eye, point, normal, hit.id)
    }

    /// Renders a whole frame on the calling thread.
    pub fn render_into(&self, surface: &mut Surface, camera: Camera) {
        let frame = FrameParams {
            descriptor: surface.descriptor(),
            camera,
        };
        for y in 0..surface.height() {
            self.render_row(&frame, y, surface.row_mut(y));
        }
    }

    fn shade_row(&self, frame: &FrameParams, basis: &ViewBasis, y: usize, row: &mut [u8]) {
        let descriptor = &frame.descriptor;
        let format = descriptor.format;
        let eye = frame.camera.position;

        for (x, dst) in row.chunks_exact_mut(descriptor.bytes_per_pixel()).enumerate() {
            let coord = view_coord(x, y, descriptor.width, descriptor.height);
            let color = self.trace_pixel(eye, basis.ray(coord));
            format.write(dst, format.pack(gamma_correct(color)));
        }
    }
}

impl RowRenderer for SceneRenderer {
    fn render_row(&self, frame: &FrameParams, y: usize, row: &mut [u8]) {
        let basis = frame.camera.basis(frame.descriptor.aspect_ratio());
        self.shade_row(frame, &basis, y, row);
    }
}
