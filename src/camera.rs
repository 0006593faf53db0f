use glam::{Quat, Vec2, Vec3};

use crate::core::{Button, Controller};

pub const CAMERA_SPEED: f32 = 0.1;
pub const CAMERA_ROTATION_SPEED: f32 = 0.05;

/// Keys held during one frame, reduced to movement axes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl MovementState {
    pub fn from_controller(controller: &dyn Controller) -> Self {
        Self {
            forward: controller.is_down(Button::KeyW),
            backward: controller.is_down(Button::KeyS),
            left: controller.is_down(Button::KeyA),
            right: controller.is_down(Button::KeyD),
            up: controller.is_down(Button::Space),
            down: controller.is_down(Button::Shift),
            rotate_left: controller.is_down(Button::KeyQ),
            rotate_right: controller.is_down(Button::KeyE),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32, f32) {
        (
            Self::to_direction(self.forward, self.backward),
            Self::to_direction(self.right, self.left),
            Self::to_direction(self.up, self.down),
        )
    }

    const fn rotation_velocity(&self) -> f32 {
        Self::to_direction(self.rotate_right, self.rotate_left)
    }
}

/// Pinhole camera. `direction` is unit length after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    direction: Vec3,
    /// Full field of view in radians.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            fov: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl Camera {
    /// Returns `None` when `direction` is zero or parallel to world up,
    /// since no view basis exists for it.
    pub fn new(position: Vec3, direction: Vec3, fov: f32) -> Option<Self> {
        Some(Self {
            position,
            direction: usable_direction(direction)?,
            fov,
        })
    }

    pub fn from_degrees(position: Vec3, direction: Vec3, fov_degrees: f32) -> Option<Self> {
        Self::new(position, direction, fov_degrees.to_radians())
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Points the camera along `direction`. Leaves it untouched and returns
    /// `false` if the direction is unusable.
    pub fn set_direction(&mut self, direction: Vec3) -> bool {
        match usable_direction(direction) {
            Some(direction) => {
                self.direction = direction;
                true
            }
            None => false,
        }
    }

    /// Moves and turns the camera by one input step.
    pub fn apply_movement(&mut self, movement: &MovementState) {
        let (fwd, strafe, rise) = movement.velocity();
        let right = self.basis(1.0).right;

        self.position += self.direction * fwd * CAMERA_SPEED
            + right * strafe * CAMERA_SPEED
            + Vec3::Y * rise * CAMERA_SPEED;

        let yaw = movement.rotation_velocity();
        if yaw != 0.0 {
            // Turning right swings the view towards the basis' right vector,
            // which is a negative rotation about +Y
            let turned = Quat::from_rotation_y(-yaw * CAMERA_ROTATION_SPEED) * self.direction;
            self.set_direction(turned);
        }
    }

    /// Orthonormal view basis scaled to the image plane at distance 1.
    pub fn basis(&self, aspect_ratio: f32) -> ViewBasis {
        let view_height = (self.fov / 2.0).tan();
        let view_width = aspect_ratio * view_height;
        let right = self.direction.cross(Vec3::Y).normalize();
        let up = right.cross(self.direction);

        ViewBasis {
            forward: self.direction,
            right,
            up,
            half_extent: Vec2::new(view_width, view_height),
        }
    }

    pub fn ray_for(&self, view_coord: Vec2, aspect_ratio: f32) -> Vec3 {
        self.basis(aspect_ratio).ray(view_coord)
    }
}

/// Camera basis for one frame; computing it once per row avoids redoing
/// the trigonometry for every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub half_extent: Vec2,
}

impl ViewBasis {
    /// World-space unit direction through `view_coord` in `[-1, 1]^2`.
    #[inline]
    pub fn ray(&self, view_coord: Vec2) -> Vec3 {
        (self.forward
            + self.right * (view_coord.x * self.half_extent.x)
            + self.up * (view_coord.y * self.half_extent.y))
            .normalize()
    }
}

/// Maps pixel `(x, y)` to the centre of its cell in `[-1, 1]^2`, +y up.
#[inline]
pub fn view_coord(x: usize, y: usize, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
        1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
    )
}

pub fn ray_for(camera: &Camera, view_coord: Vec2, aspect_ratio: f32) -> Vec3 {
    camera.ray_for(view_coord, aspect_ratio)
}

fn usable_direction(direction: Vec3) -> Option<Vec3> {
    let direction = direction.try_normalize()?;
    (direction.cross(Vec3::Y).length_squared() > 1e-12).then_some(direction)
}
