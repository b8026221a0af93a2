//! Inview Animation System
//!
//! Motion presets, easing curves, and the transition scheduler that drives
//! delayed hidden→visible style tweens.
//!
//! # Features
//!
//! - **Motion Presets**: the five named reveal variants (fade-up, fade-in,
//!   scale, slide-left, slide-right) as flat data
//! - **Easing**: standard curves plus cubic-bezier for text reveals
//! - **RevealStyle**: the interpolatable opacity/translate/scale record
//! - **TransitionScheduler**: tick-driven delayed transitions with
//!   disposal tokens, cancellation, and an optional background thread

pub mod easing;
pub mod preset;
pub mod scheduler;
pub mod style;

pub use easing::Easing;
pub use preset::{lookup, preset_names, MotionPreset, FADE_IN, FADE_UP, SCALE, SLIDE_LEFT, SLIDE_RIGHT};
pub use scheduler::{
    DisposalToken, SchedulerHandle, TransitionId, TransitionRequest, TransitionScheduler,
};
pub use style::{ApplyFn, Interpolate, RevealStyle};
