//! Inview Viewport Observer
//!
//! Tracks which host elements are inside the visible viewport.
//!
//! # Features
//!
//! - **Coalesced readings**: only the latest intersection state per element
//!   is kept; rapid crossings never queue
//! - **Idempotent re-observe**: observing an element twice shares one
//!   underlying registration
//! - **Deterministic release**: dropping the last [`Observation`] handle
//!   releases the probe subscription
//! - **Fail-open**: without an intersection capability every element is
//!   treated as visible, never stuck hidden
//! - **BoundsProbe**: a concrete probe fed by host-pushed viewport and
//!   element rectangles
//!
//! # Example
//!
//! ```rust
//! use inview_core::{ElementId, Rect};
//! use inview_observer::{BoundsProbe, ViewportObserver};
//! use std::sync::Arc;
//!
//! let probe = Arc::new(BoundsProbe::new(Rect::new(0.0, 0.0, 1280.0, 720.0)));
//! let observer = ViewportObserver::new(probe.clone());
//!
//! let hero = ElementId::new(1);
//! probe.update_bounds(hero, Rect::new(0.0, 900.0, 400.0, 300.0));
//!
//! let observation = observer.observe(hero, 0.1).unwrap();
//! assert!(!observation.is_intersecting());
//!
//! // Scrolling the element into view flips the reading
//! probe.update_bounds(hero, Rect::new(0.0, 400.0, 400.0, 300.0));
//! assert!(observation.is_intersecting());
//! ```

pub mod bounds;
pub mod observer;

pub use bounds::BoundsProbe;
pub use observer::{Observation, ObservationId, ReadingCallback, ViewportObserver};
