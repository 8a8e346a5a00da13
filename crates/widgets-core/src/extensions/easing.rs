// extensions/easing.rs
//
// Easing curves for short scripted animations such as the cue stroke.
// Pure math, no widget state.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Dips backwards before moving forward.
    BackIn,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Out-of-range and NaN inputs are clamped.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::BackIn => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                C3 * t * t * t - C1 * t * t
            }
        }
    }
}

/// Interpolate from `a` to `b` with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    a + (b - a) * easing.apply(t)
}
