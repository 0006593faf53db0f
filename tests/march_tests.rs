use glam::{Vec2, Vec3};
use sdf_marcher::camera::{ray_for, view_coord, Camera};
use sdf_marcher::march::{intersect, shadow_factor, MAX_DIST};
use sdf_marcher::scene::{Light, Material, ObjectDescription, ObjectId, Scene};
use sdf_marcher::shading::estimate_normal;

fn material() -> Material {
    Material {
        shininess: 8.0,
        diffuse: Vec3::ONE,
        specular: Vec3::ONE,
        ambient: Vec3::ONE,
    }
}

fn unit_sphere_ahead() -> Scene {
    Scene::builder()
        .material(material())
        .object(ObjectDescription::sphere(Vec3::new(0.0, 0.0, 6.0), 1.0, 0))
        .build()
}

fn overhead_light() -> Light {
    Light {
        point: Vec3::new(0.0, 10.0, 0.0),
        diffuse_intensity: Vec3::ONE,
        specular_intensity: Vec3::ONE,
    }
}

/// Origin below a light, with a small sphere offset sideways from the shadow ray.
fn occluded_by(offset: f32) -> Scene {
    Scene::builder()
        .material(material())
        .object(ObjectDescription::sphere(Vec3::new(offset, 5.0, 0.0), 0.5, 0))
        .build()
}

#[cfg(test)]
mod intersect_tests {
    use super::*;

    #[test]
    fn test_hits_unit_sphere_at_five() {
        let hit = intersect(&unit_sphere_ahead(), Vec3::ZERO, Vec3::Z);

        assert_eq!(hit.id.get(), 1);
        assert!((hit.distance - 5.0).abs() < 1e-3, "Hit distance should be ~5.0, got {}", hit.distance);
    }

    #[test]
    fn test_centre_camera_ray_hits_unit_sphere() {
        let camera = Camera::default();
        let aspect = 4.0 / 3.0;

        // Odd dimensions put a pixel centre exactly on the optical axis
        let centre = view_coord(4, 4, 9, 9);
        assert_eq!(centre, Vec2::ZERO);

        for coord in [Vec2::ZERO, centre] {
            let direction = ray_for(&camera, coord, aspect);
            let hit = intersect(&unit_sphere_ahead(), camera.position, direction);

            assert_eq!(hit.id.get(), 1);
            assert!((hit.distance - 5.0).abs() < 1e-3, "Hit distance should be ~5.0, got {}", hit.distance);
        }
    }

    #[test]
    fn test_off_axis_ray_escapes() {
        let hit = intersect(&unit_sphere_ahead(), Vec3::ZERO, Vec3::X);

        assert_eq!(hit.id, ObjectId::BACKGROUND);
        assert!(hit.distance >= MAX_DIST);
    }

    #[test]
    fn test_empty_scene_escapes_immediately() {
        let hit = intersect(&Scene::builder().build(), Vec3::ZERO, Vec3::Z);

        assert_eq!(hit.id, ObjectId::BACKGROUND);
        assert!(hit.distance >= MAX_DIST);
    }

    #[test]
    fn test_grazing_ray_terminates() {
        let direction = Vec3::new(0.0, 1.0 / 6.0, 1.0).normalize();
        let hit = intersect(&unit_sphere_ahead(), Vec3::ZERO, direction);

        assert!(hit.distance.is_finite());
    }
}

#[cfg(test)]
mod shadow_tests {
    use super::*;

    #[test]
    fn test_unobstructed_point_is_fully_lit() {
        let scene = Scene::builder().material(material()).build();
        assert_eq!(shadow_factor(&scene, Vec3::ZERO, &overhead_light()), 1.0);
    }

    #[test]
    fn test_blocked_point_is_fully_shadowed() {
        assert_eq!(shadow_factor(&occluded_by(0.0), Vec3::ZERO, &overhead_light()), 0.0);
    }

    #[test]
    fn test_shadow_grows_as_occluder_approaches_ray() {
        let factors: Vec<f32> = [0.6, 0.56, 0.53, 0.51, 0.0]
            .iter()
            .map(|&offset| shadow_factor(&occluded_by(offset), Vec3::ZERO, &overhead_light()))
            .collect();

        for factor in &factors {
            assert!((0.0..=1.0).contains(factor), "factor {factor} out of range");
        }
        assert!(
            factors.windows(2).all(|w| w[1] <= w[0]),
            "Shadow factor should not increase as the occluder closes in: {factors:?}"
        );
        assert!(factors[0] > factors[4]);
    }

    #[test]
    fn test_occluder_past_light_is_ignored() {
        let scene = Scene::builder()
            .material(material())
            .object(ObjectDescription::sphere(Vec3::new(0.0, 20.0, 0.0), 1.0, 0))
            .build();

        assert_eq!(shadow_factor(&scene, Vec3::ZERO, &overhead_light()), 1.0);
    }
}

#[cfg(test)]
mod normal_tests {
    use super::*;

    #[test]
    fn test_normals_at_hits_are_unit_length() {
        let scene = Scene::builder()
            .material(material())
            .object(ObjectDescription::plane(-2.0, 0))
            .object(ObjectDescription::sphere(Vec3::new(-1.5, 0.0, 6.0), 1.0, 0))
            .object(ObjectDescription::rounded_box(
                Vec3::new(1.5, 0.0, 6.0),
                Vec3::splat(0.7),
                0.1,
                0,
            ))
            .build();

        for x in -4..=4 {
            for y in -3..=1 {
                let direction = Vec3::new(x as f32 * 0.1, y as f32 * 0.1, 1.0).normalize();
                let hit = intersect(&scene, Vec3::ZERO, direction);
                if hit.id.is_background() {
                    continue;
                }
                let normal = estimate_normal(&scene, direction * hit.distance, hit.distance);
                assert!((normal.length() - 1.0).abs() < 1e-3, "normal {normal} for ray {direction}");
            }
        }
    }

    #[test]
    fn test_sphere_normal_points_outward() {
        let scene = unit_sphere_ahead();
        let hit = intersect(&scene, Vec3::ZERO, Vec3::Z);
        let normal = estimate_normal(&scene, Vec3::Z * hit.distance, hit.distance);

        assert!(normal.dot(Vec3::NEG_Z) > 0.99, "got {normal}");
    }
}
