mod error;
mod object;

pub mod demo;
pub mod description;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

pub use description::{ObjectDescription, SceneDescription};
pub use error::SceneError;
pub use object::{NodeId, Object, ObjectId, Shape};

/// Phong reflectance coefficients. Components may exceed 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shininess: f32,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub ambient: Vec3,
}

impl Material {
    /// Reflects nothing. Used for the background id.
    pub const VOID: Material = Material {
        shininess: 1.0,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
        ambient: Vec3::ZERO,
    };
}

/// Point light. Ambient light is scene-global, not per light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub point: Vec3,
    pub diffuse_intensity: Vec3,
    pub specular_intensity: Vec3,
}

/// Immutable scene shared by every render worker.
///
/// Objects live in an arena; `roots` lists the top-level objects in the
/// order that defines their [`ObjectId`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    materials: Vec<Material>,
    ambient_color: Vec3,
    lights: Vec<Light>,
    nodes: Vec<Object>,
    roots: Vec<NodeId>,
    camera: Camera,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Initial camera. The driver owns the live copy.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Number of top-level objects.
    pub fn object_count(&self) -> usize {
        self.roots.len()
    }

    /// Top-level objects paired with their ids, in list order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.roots
            .iter()
            .enumerate()
            .map(|(i, &node)| (ObjectId::from_index(i), self.node(node)))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Every arena node, nested blend children included.
    pub fn nodes(&self) -> &[Object] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Object {
        &self.nodes[id.index()]
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        id.index().map(|i| self.node(self.roots[i]))
    }

    /// Material that shades the given object id.
    ///
    /// The background maps to [`Material::VOID`]. Panics if the object's
    /// material index is out of range, which [`Scene::validate`] rules out.
    pub fn material_for(&self, id: ObjectId) -> &Material {
        match self.object(id) {
            Some(object) => &self.materials[object.material],
            None => &Material::VOID,
        }
    }

    /// Checks that every object references an existing material.
    pub fn validate(&self) -> Result<(), SceneError> {
        let count = self.materials.len();
        match self.nodes.iter().position(|node| node.material >= count) {
            Some(node) => Err(SceneError::InvalidMaterial {
                node,
                material: self.nodes[node].material,
                count,
            }),
            None => Ok(()),
        }
    }
}

/// True iff every object's material index is within the material list.
pub fn validate_materials(scene: &Scene) -> bool {
    scene.validate().is_ok()
}

/// Incremental scene construction.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    materials: Vec<Material>,
    ambient_color: Vec3,
    lights: Vec<Light>,
    nodes: Vec<Object>,
    roots: Vec<NodeId>,
    camera: Camera,
}

impl SceneBuilder {
    pub fn material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn ambient(mut self, color: Vec3) -> Self {
        self.ambient_color = color;
        self
    }

    pub fn light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Appends a top-level object; nested blend children go into the arena.
    pub fn object(mut self, description: ObjectDescription) -> Self {
        let root = self.insert(description);
        self.roots.push(root);
        self
    }

    pub fn build(self) -> Scene {
        Scene {
            materials: self.materials,
            ambient_color: self.ambient_color,
            lights: self.lights,
            nodes: self.nodes,
            roots: self.roots,
            camera: self.camera,
        }
    }

    fn insert(&mut self, description: ObjectDescription) -> NodeId {
        let object = match description {
            ObjectDescription::Sphere {
                point,
                radius,
                material,
            } => Object {
                point,
                material,
                shape: Shape::Sphere { radius },
            },
            ObjectDescription::Box {
                point,
                half_extents,
                corner_radius,
                material,
            } => Object {
                point,
                material,
                shape: Shape::Box {
                    half_extents,
                    corner_radius,
                },
            },
            ObjectDescription::Plane { y, material } => Object {
                point: Vec3::new(0.0, y, 0.0),
                material,
                shape: Shape::Plane { y },
            },
            ObjectDescription::SmoothUnion {
                a,
                b,
                smoothness,
                material,
            } => {
                let left = self.insert(*a);
                let right = self.insert(*b);
                Object {
                    point: Vec3::ZERO,
                    material,
                    shape: Shape::SmoothUnion {
                        left,
                        right,
                        smoothness,
                    },
                }
            }
        };

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(object);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matte() -> Material {
        Material {
            shininess: 8.0,
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.2),
            ambient: Vec3::splat(1.0),
        }
    }

    #[test]
    fn test_empty_scene_is_valid() {
        let scene = Scene::builder().build();
        assert_eq!(scene.object_count(), 0);
        assert!(validate_materials(&scene));
    }

    #[test]
    fn test_material_out_of_range_is_rejected() {
        let scene = Scene::builder()
            .material(matte())
            .object(ObjectDescription::sphere(Vec3::ZERO, 1.0, 0))
            .object(ObjectDescription::sphere(Vec3::X, 1.0, 1))
            .build();

        assert!(!validate_materials(&scene));
        match scene.validate() {
            Err(SceneError::InvalidMaterial {
                node,
                material,
                count,
            }) => {
                assert_eq!(node, 1);
                assert_eq!(material, 1);
                assert_eq!(count, 1);
            }
            other => panic!("expected InvalidMaterial, got {other:?}"),
        }
    }

    #[test]
    fn test_objects_without_materials_fail() {
        let scene = Scene::builder()
            .object(ObjectDescription::plane(0.0, 0))
            .build();
        assert!(!validate_materials(&scene));
    }

    #[test]
    fn test_blend_children_are_arena_nodes() {
        let scene = Scene::builder()
            .material(matte())
            .object(ObjectDescription::smooth_union(
                ObjectDescription::sphere(Vec3::ZERO, 1.0, 0),
                ObjectDescription::sphere(Vec3::X, 1.0, 0),
                0.5,
                0,
            ))
            .object(ObjectDescription::plane(-1.0, 0))
            .build();

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.nodes().len(), 4);

        let (id, blend) = scene.objects().next().expect("blend root");
        assert_eq!(id, ObjectId::from_index(0));
        match blend.shape {
            Shape::SmoothUnion { left, right, .. } => {
                assert!(left.index() < scene.roots()[0].index());
                assert!(right.index() < scene.roots()[0].index());
            }
            other => panic!("expected a blend node, got {other:?}"),
        }
    }

    #[test]
    fn test_plane_point_tracks_height() {
        let scene = Scene::builder()
            .material(matte())
            .object(ObjectDescription::plane(-2.5, 0))
            .build();
        let plane = scene.object(ObjectId::from_index(0)).expect("plane");
        assert_eq!(plane.point, Vec3::new(0.0, -2.5, 0.0));
    }

    #[test]
    fn test_background_uses_void_material() {
        let scene = Scene::builder()
            .material(matte())
            .object(ObjectDescription::sphere(Vec3::ZERO, 1.0, 0))
            .build();
        assert_eq!(*scene.material_for(ObjectId::BACKGROUND), Material::VOID);
        assert_eq!(*scene.material_for(ObjectId::from_index(0)), matte());
    }

    #[test]
    fn test_nested_child_material_is_validated() {
        let scene = Scene::builder()
            .material(matte())
            .object(ObjectDescription::smooth_union(
                ObjectDescription::sphere(Vec3::ZERO, 1.0, 0),
                ObjectDescription::sphere(Vec3::X, 1.0, 3),
                0.5,
                0,
            ))
            .build();
        assert!(!validate_materials(&scene));
    }
}
