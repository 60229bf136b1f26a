//! Easing curves used by the timelines.

/// Easing curve applied to a tween's normalised progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Linear. Scroll-scrubbed entrances use this so position maps 1:1 to value.
    #[default]
    None,
    /// Quadratic ease-in (accelerating).
    Power2In,
    /// Quadratic ease-out (decelerating).
    Power2Out,
    /// Cubic ease-out.
    Power3Out,
}

impl Ease {
    /// Maps `t` (clamped to `[0, 1]`) through the curve. Endpoints are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::None => t,
            Self::Power2In => t * t,
            Self::Power2Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Power3Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Linear interpolation that returns `a` at 0 and `b` at 1 exactly.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
