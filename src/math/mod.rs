mod scalar;
mod vector;

pub use glam::{Vec2, Vec3};
pub use scalar::{clamp, lerp, smooth_min};
pub use vector::VecExt;
