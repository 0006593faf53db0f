use glam::Vec3;

use super::scalar::clamp;

/// Component-wise helpers glam does not provide under these semantics.
pub trait VecExt {
    /// Clamps every component into `[min, max]`.
    fn clamp_each(self, min: f32, max: f32) -> Self;

    /// Raises every component to `exp`.
    fn pow_each(self, exp: f32) -> Self;
}

impl VecExt for Vec3 {
    #[inline]
    fn clamp_each(self, min: f32, max: f32) -> Self {
        Vec3::new(
            clamp(self.x, min, max),
            clamp(self.y, min, max),
            clamp(self.z, min, max),
        )
    }

    #[inline]
    fn pow_each(self, exp: f32) -> Self {
        Vec3::new(self.x.powf(exp), self.y.powf(exp), self.z.powf(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_each() {
        let v = Vec3::new(-0.5, 0.5, 1.5).clamp_each(0.0, 1.0);
        assert_eq!(v, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_pow_each_gamma() {
        let v = Vec3::new(0.0, 1.0, 0.25).pow_each(0.5);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 1.0);
        assert!((v.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cross_matches_camera_basis() {
        // Looking down +Z with +Y up puts "right" on -X
        let right = Vec3::Z.cross(Vec3::Y).normalize();
        assert_eq!(right, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(right.cross(Vec3::Z), Vec3::Y);
    }
}
