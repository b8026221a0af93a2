//! Easing curves
//!
//! Standard cubic curves plus arbitrary cubic-bezier, evaluated as
//! progress 0.0..=1.0 → eased 0.0..=1.0. Bezier evaluation solves the
//! parametric x(t) = progress by bisection; the curve's control points are
//! the same (x1, y1, x2, y2) quadruple CSS uses.

/// An easing function applied to normalized animation progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::EaseOut
    }
}

impl Easing {
    /// Apply the curve to a progress value, clamped to 0.0..=1.0
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// Evaluate one bezier axis at parameter `t` with control values (c1, c2)
///
/// Endpoints are fixed at 0 and 1, matching CSS cubic-bezier.
fn bezier_axis(t: f32, c1: f32, c2: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * c1 + 3.0 * inv * t * t * c2 + t * t * t
}

fn cubic_bezier(progress: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    // x(t) is monotonic for valid control points (0 <= x1, x2 <= 1),
    // so bisection converges on the unique t with x(t) = progress.
    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    let mut t = progress;

    for _ in 0..32 {
        let x = bezier_axis(t, x1, x2);
        if (x - progress).abs() < 1e-5 {
            break;
        }
        if x < progress {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }

    bezier_axis(t, y1, y2)
}
