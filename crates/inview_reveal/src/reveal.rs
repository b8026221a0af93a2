//! Reveal regions
//!
//! A reveal region wraps one host element: while the element stays outside
//! the viewport the region holds its preset's hidden style, and when the
//! element crosses the observation threshold the region tweens to the
//! visible style after its configured delay.
//!
//! # Example
//!
//! ```ignore
//! use inview_reveal::prelude::*;
//!
//! let controller = reveal()
//!     .preset("fade-up")
//!     .delay_ms(150.0)
//!     .once(true)
//!     .mount(&observer, &scheduler.handle(), hero_section, move |style| {
//!         host.set_opacity(hero_section, style.opacity);
//!         host.set_offset(hero_section, style.translate_x, style.translate_y);
//!     })?;
//! ```
//!
//! Configuration problems (unknown preset, negative delay, out-of-range
//! threshold) surface from `mount`, before anything is observed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use inview_animation::{
    lookup, ApplyFn, DisposalToken, MotionPreset, RevealStyle, SchedulerHandle, TransitionId,
    TransitionRequest,
};
use inview_core::{ConfigError, ElementId, VisibilityState};
use inview_observer::{Observation, ViewportObserver};

/// Immutable configuration of one reveal region
#[derive(Clone, Copy, Debug)]
pub struct RevealConfig {
    pub preset: &'static MotionPreset,
    pub delay_ms: f32,
    pub once: bool,
}

impl RevealConfig {
    /// Build a config from a preset name, failing fast on unknown names
    pub fn new(preset_name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            preset: lookup(preset_name)?,
            delay_ms: 0.0,
            once: true,
        })
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            preset: &inview_animation::FADE_UP,
            delay_ms: 0.0,
            once: true,
        }
    }
}

/// Create a reveal region builder with the default configuration
/// (fade-up, no delay, play once, threshold 0.1)
pub fn reveal() -> RevealBuilder {
    RevealBuilder {
        preset_name: "fade-up".to_string(),
        delay_ms: 0.0,
        once: true,
        threshold: 0.1,
    }
}

/// Builder for a reveal region
pub struct RevealBuilder {
    preset_name: String,
    delay_ms: f32,
    once: bool,
    threshold: f32,
}

impl RevealBuilder {
    /// Select the motion preset by name
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.preset_name = name.into();
        self
    }

    /// Delay before the reveal transition starts, in milliseconds
    pub fn delay_ms(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Whether the reveal plays once (default) or replays on re-entry
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Fraction of the element that must be on screen to trigger
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Mount the region: validate the configuration, apply the hidden
    /// style, and start observing the element
    pub fn mount(
        self,
        observer: &ViewportObserver,
        scheduler: &SchedulerHandle,
        element: ElementId,
        apply: impl Fn(RevealStyle) + Send + Sync + 'static,
    ) -> Result<RevealController, ConfigError> {
        let preset = lookup(&self.preset_name)?;
        let delay_ms = ConfigError::check_delay(self.delay_ms)?;

        let config = RevealConfig {
            preset,
            delay_ms,
            once: self.once,
        };

        RevealController::mount(config, self.threshold, observer, scheduler, element, apply)
    }
}

/// Shared state between the controller, its observation sink, and the
/// scheduler's apply callback
struct ControllerShared {
    config: RevealConfig,
    state: Mutex<VisibilityState>,
    /// Style most recently pushed to the host; reversals tween from here
    applied: Arc<Mutex<RevealStyle>>,
    pending: Mutex<Option<TransitionId>>,
    transitions: AtomicU64,
    scheduler: SchedulerHandle,
    token: DisposalToken,
    apply: ApplyFn,
}

impl ControllerShared {
    /// React to a coalesced intersection reading
    fn on_reading(self: &Arc<Self>, intersecting: bool) {
        let next = {
            let mut state = self.state.lock().unwrap();
            let next = state.apply_reading(intersecting, self.config.once);
            if next == *state {
                return;
            }
            *state = next;
            next
        };

        self.transitions.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?next, "reveal state changed");

        let from = *self.applied.lock().unwrap();
        let (to, delay_ms) = match next {
            // The configured delay gates the reveal only; hiding is immediate
            VisibilityState::Visible => (self.config.preset.visible, self.config.delay_ms),
            VisibilityState::Hidden => (self.config.preset.hidden, 0.0),
        };

        let mut pending = self.pending.lock().unwrap();
        if let Some(id) = pending.take() {
            // Last-write-wins: the newest target style replaces the old one
            self.scheduler.cancel(id);
        }
        *pending = self.scheduler.schedule(TransitionRequest {
            from,
            to,
            delay_ms,
            duration_ms: self.config.preset.duration_ms,
            easing: self.config.preset.easing,
            token: self.token.clone(),
            apply: self.apply.clone(),
        });
    }
}

/// A mounted reveal region
///
/// Dropping the controller unmounts the region: the disposal token is
/// tripped, the pending transition is cancelled, and the observation is
/// released. No style is applied after that point.
pub struct RevealController {
    shared: Arc<ControllerShared>,
    // Held for its Drop: releasing it ends reading delivery
    _observation: Observation,
}

impl std::fmt::Debug for RevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealController").finish_non_exhaustive()
    }
}

impl RevealController {
    fn mount(
        config: RevealConfig,
        threshold: f32,
        observer: &ViewportObserver,
        scheduler: &SchedulerHandle,
        element: ElementId,
        apply: impl Fn(RevealStyle) + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        let applied = Arc::new(Mutex::new(config.preset.hidden));

        // Every style sample records itself before reaching the host, so
        // interrupted transitions can resume from the live value.
        let record = applied.clone();
        let apply: ApplyFn = Arc::new(move |style| {
            *record.lock().unwrap() = style;
            apply(style);
        });

        // Regions start hidden; the first reading may immediately reveal
        apply(config.preset.hidden);

        let mut observation = observer.observe(element, threshold)?;

        let shared = Arc::new(ControllerShared {
            config,
            state: Mutex::new(VisibilityState::Hidden),
            applied,
            pending: Mutex::new(None),
            transitions: AtomicU64::new(0),
            scheduler: scheduler.clone(),
            token: DisposalToken::new(),
            apply,
        });

        let sink = shared.clone();
        observation.subscribe(move |intersecting| sink.on_reading(intersecting));

        Ok(Self {
            shared,
            _observation: observation,
        })
    }

    /// Current visibility state
    pub fn state(&self) -> VisibilityState {
        *self.shared.state.lock().unwrap()
    }

    /// Style most recently applied to the host element
    pub fn style(&self) -> RevealStyle {
        *self.shared.applied.lock().unwrap()
    }

    /// Number of state transitions so far
    pub fn transition_count(&self) -> u64 {
        self.shared.transitions.load(Ordering::Relaxed)
    }

    /// The region's configuration
    pub fn config(&self) -> RevealConfig {
        self.shared.config
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.shared.token.dispose();
        if let Some(id) = self.shared.pending.lock().unwrap().take() {
            self.shared.scheduler.cancel(id);
        }
        tracing::trace!("reveal region unmounted");
    }
}
