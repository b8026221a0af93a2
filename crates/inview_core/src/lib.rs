//! Inview Core
//!
//! Foundational primitives for viewport-driven reveal animations:
//!
//! - **Geometry**: rectangles and intersection math for visibility checks
//! - **Visibility State**: the Hidden/Visible state machine with a
//!   play-once latch
//! - **Viewport Capability**: the injected [`ViewportProbe`] trait and its
//!   cancellable subscription type
//! - **Errors**: the configuration error taxonomy, surfaced at setup time
//!
//! # Example
//!
//! ```rust
//! use inview_core::{Rect, VisibilityState};
//!
//! let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
//! let element = Rect::new(100.0, 650.0, 300.0, 200.0);
//!
//! // A third of the element is on screen
//! let fraction = element.visible_fraction(&viewport);
//! assert!(fraction > 0.3 && fraction < 0.4);
//!
//! // Crossing the default 0.1 threshold reveals the element
//! let state = VisibilityState::Hidden.apply_reading(fraction >= 0.1, true);
//! assert_eq!(state, VisibilityState::Visible);
//! ```

pub mod element;
pub mod error;
pub mod geometry;
pub mod probe;
pub mod visibility;

pub use element::{ElementId, ElementIdGenerator};
pub use error::ConfigError;
pub use geometry::{Point, Rect, Size};
pub use probe::{ProbeSink, ProbeSubscription, ViewportProbe};
pub use visibility::VisibilityState;
