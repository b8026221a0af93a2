//! Transition scheduler
//!
//! Runs delayed reveal transitions. A scheduled transition waits out its
//! delay, then interpolates from its start style to its target style over
//! its duration, pushing each sample through the owning region's apply
//! callback.
//!
//! Transitions carry a [`DisposalToken`]: once the owning region is
//! disposed, a pending or in-flight transition is dropped without applying
//! any further style. Overlapping triggers are handled by the caller
//! cancelling the previous transition id (last-write-wins on the target).
//!
//! # Background Thread Mode
//!
//! The scheduler is tick-driven. Hosts with their own frame loop call
//! `tick(dt_ms)` each frame; hosts without one can run the scheduler on its
//! own thread via `start_background()`.
//!
//! ```ignore
//! let scheduler = TransitionScheduler::new();
//! scheduler.start_background(); // ticks at 120fps until dropped
//! ```

use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::easing::Easing;
use crate::style::{ApplyFn, Interpolate, RevealStyle};

new_key_type! {
    /// Handle to a scheduled transition
    pub struct TransitionId;
}

/// Cloneable disposal flag shared between a region and its transitions
///
/// Disposing the token suppresses every transition carrying it: the
/// scheduler checks the token before applying any style, so a transition
/// firing after its region was unmounted becomes a silent no-op.
#[derive(Clone, Debug, Default)]
pub struct DisposalToken(Arc<AtomicBool>);

impl DisposalToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn dispose(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Everything needed to run one style transition
pub struct TransitionRequest {
    pub from: RevealStyle,
    pub to: RevealStyle,
    pub delay_ms: f32,
    pub duration_ms: u32,
    pub easing: Easing,
    pub token: DisposalToken,
    pub apply: ApplyFn,
}

struct ScheduledTransition {
    request: TransitionRequest,
    elapsed_ms: f32,
}

impl ScheduledTransition {
    /// Advance by `dt_ms`; returns `true` while the transition stays active
    fn tick(&mut self, dt_ms: f32) -> bool {
        if self.request.token.is_disposed() {
            tracing::debug!("transition owner disposed, dropping without applying");
            return false;
        }

        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.request.delay_ms {
            return true;
        }

        let progress = if self.request.duration_ms == 0 {
            1.0
        } else {
            ((self.elapsed_ms - self.request.delay_ms) / self.request.duration_ms as f32)
                .clamp(0.0, 1.0)
        };

        let eased = self.request.easing.apply(progress);
        let style = self.request.from.lerp(&self.request.to, eased);
        (self.request.apply)(style);

        progress < 1.0
    }
}

struct SchedulerInner {
    transitions: SlotMap<TransitionId, ScheduledTransition>,
    last_frame: Instant,
}

/// The scheduler that ticks all pending reveal transitions
///
/// Typically owned by the application; regions register transitions through
/// a cloneable [`SchedulerHandle`].
pub struct TransitionScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for the background thread
    stop_flag: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                transitions: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Get a handle to this scheduler for passing to regions
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Tick all transitions by an explicit delta
    ///
    /// Returns `true` if any transitions are still pending or in flight.
    pub fn tick(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.last_frame = Instant::now();
        inner
            .transitions
            .retain(|_, transition| transition.tick(dt_ms));
        !inner.transitions.is_empty()
    }

    /// Tick using wall-clock time since the previous tick
    pub fn tick_now(&self) -> bool {
        let dt_ms = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            dt
        };
        self.tick(dt_ms)
    }

    /// Number of transitions still registered
    pub fn transition_count(&self) -> usize {
        self.inner.lock().unwrap().transitions.len()
    }

    /// Start ticking on a background thread at 120fps
    ///
    /// Keeps reveal transitions advancing for hosts without a frame loop.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / 120);

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                {
                    let mut inner = inner.lock().unwrap();
                    let now = Instant::now();
                    let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
                    inner.last_frame = now;
                    inner
                        .transitions
                        .retain(|_, transition| transition.tick(dt_ms));
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Default for TransitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransitionScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the transition scheduler
///
/// Passed to regions that need to register transitions. It won't prevent
/// the scheduler from being dropped; scheduling against a dropped
/// scheduler is a logged no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a transition and return its id
    pub fn schedule(&self, request: TransitionRequest) -> Option<TransitionId> {
        let Some(inner) = self.inner.upgrade() else {
            tracing::debug!("transition scheduler dropped, ignoring schedule request");
            return None;
        };

        let mut guard = inner.lock().unwrap();
        // Reset last_frame so the first wall-clock tick after an idle
        // period doesn't swallow the delay in one giant dt.
        guard.last_frame = Instant::now();
        Some(guard.transitions.insert(ScheduledTransition {
            request,
            elapsed_ms: 0.0,
        }))
    }

    /// Cancel a pending or in-flight transition
    pub fn cancel(&self, id: TransitionId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().transitions.remove(id);
        }
    }

    /// Check whether a transition is still registered
    pub fn is_active(&self, id: TransitionId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().transitions.contains_key(id))
            .unwrap_or(false)
    }
}
