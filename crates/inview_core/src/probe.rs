//! Viewport capability trait
//!
//! Intersection detection is an injected capability: the host environment
//! implements [`ViewportProbe`] and pushes visible-fraction readings to the
//! observer. When no probe exists the observer fails open (every element is
//! treated as visible) instead of leaving content hidden.
//!
//! Subscriptions are cancellable by dropping the returned
//! [`ProbeSubscription`]; the probe must stop delivering readings for that
//! subscriber once it is dropped.

use std::sync::Arc;

use crate::element::ElementId;

/// Callback receiving the latest visible fraction (0.0 to 1.0) for an element
pub type ProbeSink = Arc<dyn Fn(f32) + Send + Sync>;

/// Source of viewport intersection readings
///
/// Implementations push a reading whenever the element's visible fraction
/// may have changed, and should push the current reading immediately on
/// subscribe so new observations do not wait for the next layout pass.
pub trait ViewportProbe: Send + Sync {
    /// Begin delivering visible-fraction readings for `target` to `sink`
    fn subscribe(&self, target: ElementId, sink: ProbeSink) -> ProbeSubscription;
}

/// RAII handle to an active probe subscription
///
/// Dropping the handle cancels the subscription. Failing to release an
/// observation is a resource leak; tying cancellation to `Drop` makes
/// release deterministic.
pub struct ProbeSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ProbeSubscription {
    /// Create a subscription whose cancellation runs `cancel` once
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Cancel the subscription now instead of at drop time
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ProbeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ProbeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_cancels_on_drop() {
        let cancelled = Arc::new(AtomicUsize::new(0));

        let c = cancelled.clone();
        let sub = ProbeSubscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
        drop(sub);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_cancel_runs_once() {
        let cancelled = Arc::new(AtomicUsize::new(0));

        let c = cancelled.clone();
        let sub = ProbeSubscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sub.cancel();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_subscription() {
        let sub = ProbeSubscription::noop();
        drop(sub);
    }
}
