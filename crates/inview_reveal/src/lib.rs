//! Inview Reveal
//!
//! Scroll-triggered reveal regions: wrap a host element, pick a motion
//! preset, and the region tweens from its hidden style to visible as the
//! element enters the viewport.
//!
//! # Features
//!
//! - **Reveal regions**: builder API over the five motion presets with
//!   per-region delay, threshold, and play-once control
//! - **Staggered text**: split a sentence into words and reveal them with
//!   per-word delays from one container-level observation
//! - **Deterministic unmount**: dropping a region cancels its pending
//!   transitions and releases its observation; nothing is applied after
//!
//! # Example
//!
//! ```rust
//! use inview_reveal::prelude::*;
//! use std::sync::Arc;
//!
//! let probe = Arc::new(BoundsProbe::new(Rect::new(0.0, 0.0, 1280.0, 720.0)));
//! let observer = ViewportObserver::new(probe.clone());
//! let scheduler = TransitionScheduler::new();
//!
//! let card = ElementId::new(1);
//! probe.update_bounds(card, Rect::new(0.0, 900.0, 400.0, 300.0));
//!
//! let region = reveal()
//!     .preset("slide-left")
//!     .delay_ms(100.0)
//!     .mount(&observer, &scheduler.handle(), card, |_style| {
//!         // push style to the host element
//!     })
//!     .unwrap();
//! assert_eq!(region.state(), VisibilityState::Hidden);
//!
//! // Scrolling the card into view triggers the reveal
//! probe.update_bounds(card, Rect::new(0.0, 300.0, 400.0, 300.0));
//! assert_eq!(region.state(), VisibilityState::Visible);
//! ```

pub mod prelude;
pub mod reveal;
pub mod text;

pub use reveal::{reveal, RevealBuilder, RevealConfig, RevealController};
pub use text::{
    split_words, text_reveal, StaggerDirection, TextReveal, TextRevealBuilder, WordToken,
    WORD_HIDDEN,
};
