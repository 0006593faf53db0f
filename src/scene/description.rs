//! Serde form of a scene, as loaded from JSON files.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{Light, Material, Scene, SceneError};
use crate::camera::Camera;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub point: Vec3,
    pub direction: Vec3,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            direction: Vec3::Z,
            fov: 90.0,
        }
    }
}

/// Object tree as written in a description; blend nodes own their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        point: Vec3,
        radius: f32,
        #[serde(default)]
        material: usize,
    },
    Box {
        point: Vec3,
        #[serde(alias = "point2")]
        half_extents: Vec3,
        #[serde(default, alias = "radius")]
        corner_radius: f32,
        #[serde(default)]
        material: usize,
    },
    Plane {
        y: f32,
        #[serde(default)]
        material: usize,
    },
    SmoothUnion {
        a: Box<ObjectDescription>,
        b: Box<ObjectDescription>,
        smoothness: f32,
        #[serde(default)]
        material: usize,
    },
}

impl ObjectDescription {
    pub fn sphere(point: Vec3, radius: f32, material: usize) -> Self {
        Self::Sphere {
            point,
            radius,
            material,
        }
    }

    pub fn rounded_box(point: Vec3, half_extents: Vec3, corner_radius: f32, material: usize) -> Self {
        Self::Box {
            point,
            half_extents,
            corner_radius,
            material,
        }
    }

    pub fn plane(y: f32, material: usize) -> Self {
        Self::Plane { y, material }
    }

    pub fn smooth_union(a: Self, b: Self, smoothness: f32, material: usize) -> Self {
        Self::SmoothUnion {
            a: Box::new(a),
            b: Box::new(b),
            smoothness,
            material,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub materials: Vec<Material>,
    pub ambient: Vec3,
    pub camera: CameraDescription,
    pub lights: Vec<Light>,
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Flattens the description into a scene. Material indices are not
    /// checked here; call [`Scene::validate`] before rendering.
    pub fn into_scene(self) -> Result<Scene, SceneError> {
        let camera = Camera::from_degrees(self.camera.point, self.camera.direction, self.camera.fov)
            .ok_or(SceneError::DegenerateCamera)?;

        let builder = self.materials.into_iter().fold(Scene::builder(), |b, m| b.material(m));
        let builder = self.lights.into_iter().fold(builder, |b, l| b.light(l));
        let builder = self.objects.into_iter().fold(builder, |b, o| b.object(o));

        Ok(builder.ambient(self.ambient).camera(camera).build())
    }
}
