//! One-stop imports for building reveal regions
//!
//! ```ignore
//! use inview_reveal::prelude::*;
//! ```

pub use crate::reveal::{reveal, RevealBuilder, RevealConfig, RevealController};
pub use crate::text::{
    split_words, text_reveal, StaggerDirection, TextReveal, TextRevealBuilder, WordToken,
    WORD_HIDDEN,
};

pub use inview_animation::{
    lookup, preset_names, Easing, MotionPreset, RevealStyle, SchedulerHandle, TransitionScheduler,
};
pub use inview_core::{ConfigError, ElementId, ElementIdGenerator, Rect, VisibilityState};
pub use inview_observer::{BoundsProbe, Observation, ViewportObserver};
