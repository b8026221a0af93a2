//! Reveal style values
//!
//! The visual properties a reveal transition animates. Styles interpolate
//! field-wise; the identity style (fully visible, untransformed) is the
//! target of every reveal.

use std::sync::Arc;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

/// Visual style applied to a revealed region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    /// Opacity, 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f32,
    /// Horizontal offset in pixels
    pub translate_x: f32,
    /// Vertical offset in pixels (positive = down)
    pub translate_y: f32,
    /// Uniform scale factor
    pub scale: f32,
}

impl RevealStyle {
    /// Fully visible, untransformed
    pub const VISIBLE: RevealStyle = RevealStyle {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Fully transparent, untransformed
    pub const fn hidden() -> Self {
        RevealStyle {
            opacity: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }

    pub const fn with_translate_x(mut self, dx: f32) -> Self {
        self.translate_x = dx;
        self
    }

    pub const fn with_translate_y(mut self, dy: f32) -> Self {
        self.translate_y = dy;
        self
    }

    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl Interpolate for RevealStyle {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        RevealStyle {
            opacity: self.opacity.lerp(&other.opacity, t),
            translate_x: self.translate_x.lerp(&other.translate_x, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.opacity.approx_eq(&other.opacity, epsilon)
            && self.translate_x.approx_eq(&other.translate_x, epsilon)
            && self.translate_y.approx_eq(&other.translate_y, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
    }
}

/// Callback applying a style to the host's visual element
pub type ApplyFn = Arc<dyn Fn(RevealStyle) + Send + Sync>;
