//! Motion preset table
//!
//! The five named reveal variants as flat, immutable data. A preset pairs a
//! hidden style with its visible counterpart plus transition timing; the
//! table is a pure lookup and unknown names are a configuration error at
//! setup time, never during an animation.

use inview_core::ConfigError;

use crate::easing::Easing;
use crate::style::RevealStyle;

/// A named reveal animation: hidden/visible style deltas and timing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPreset {
    pub name: &'static str,
    pub hidden: RevealStyle,
    pub visible: RevealStyle,
    pub duration_ms: u32,
    pub easing: Easing,
}

/// Fade in while rising 30px
pub const FADE_UP: MotionPreset = MotionPreset {
    name: "fade-up",
    hidden: RevealStyle::hidden().with_translate_y(30.0),
    visible: RevealStyle::VISIBLE,
    duration_ms: 600,
    easing: Easing::EaseOut,
};

/// Plain opacity fade
pub const FADE_IN: MotionPreset = MotionPreset {
    name: "fade-in",
    hidden: RevealStyle::hidden(),
    visible: RevealStyle::VISIBLE,
    duration_ms: 500,
    easing: Easing::EaseOut,
};

/// Fade in while scaling up from 90%
pub const SCALE: MotionPreset = MotionPreset {
    name: "scale",
    hidden: RevealStyle::hidden().with_scale(0.9),
    visible: RevealStyle::VISIBLE,
    duration_ms: 500,
    easing: Easing::EaseOut,
};

/// Fade in while sliding from 50px left of rest
pub const SLIDE_LEFT: MotionPreset = MotionPreset {
    name: "slide-left",
    hidden: RevealStyle::hidden().with_translate_x(-50.0),
    visible: RevealStyle::VISIBLE,
    duration_ms: 500,
    easing: Easing::EaseOut,
};

/// Fade in while sliding from 50px right of rest
pub const SLIDE_RIGHT: MotionPreset = MotionPreset {
    name: "slide-right",
    hidden: RevealStyle::hidden().with_translate_x(50.0),
    visible: RevealStyle::VISIBLE,
    duration_ms: 500,
    easing: Easing::EaseOut,
};

const PRESETS: [&MotionPreset; 5] = [&FADE_UP, &FADE_IN, &SCALE, &SLIDE_LEFT, &SLIDE_RIGHT];

/// Look up a preset by name
pub fn lookup(name: &str) -> Result<&'static MotionPreset, ConfigError> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .copied()
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

/// The known preset names, in table order
pub fn preset_names() -> [&'static str; 5] {
    ["fade-up", "fade-in", "scale", "slide-left", "slide-right"]
}
