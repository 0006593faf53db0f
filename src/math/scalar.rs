/// Clamps `v` into `[min, max]`; NaN collapses to `min`.
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

#[inline]
pub fn lerp(from: f32, to: f32, ratio: f32) -> f32 {
    from + (to - from) * ratio
}

/// Polynomial smooth minimum of two distances.
///
/// `k` is the blend radius and must be positive. The result never exceeds
/// `a.min(b)` and approaches it as `k` shrinks.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    let h = clamp(0.5 + 0.5 * (b - a) / k, 0.0, 1.0);
    lerp(b, a, h) - k * h * (1.0 - h)
}
