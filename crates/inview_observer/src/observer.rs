//! Viewport observation registry
//!
//! One [`ViewportObserver`] owns all observations for a probe. Each
//! observed element gets a single registry entry no matter how many
//! [`Observation`] handles point at it; the probe is subscribed exactly
//! once per element, and the entry is removed when the last handle drops.
//!
//! Readings coalesce: an entry stores only the latest boolean intersection
//! state, and subscriber callbacks fire only when that state flips.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use inview_core::{ConfigError, ElementId, ProbeSubscription, ViewportProbe};

new_key_type! {
    /// Key for a registered observation
    pub struct ObservationId;
}

/// Callback receiving coalesced intersection readings
pub type ReadingCallback = Arc<dyn Fn(bool) + Send + Sync>;

struct ObservationEntry {
    element: ElementId,
    threshold: f32,
    /// Latest coalesced reading; older readings are overwritten, never queued
    latest: bool,
    /// Set once the element has ever been intersecting
    ever_visible: bool,
    /// Live `Observation` handles pointing at this entry
    handles: usize,
    next_sink: u64,
    sinks: SmallVec<[(u64, ReadingCallback); 2]>,
    probe_sub: Option<ProbeSubscription>,
}

impl ObservationEntry {
    fn intersecting(&self, fraction: f32) -> bool {
        // Threshold 0.0 still requires actual overlap, matching the
        // "any part visible" reading of a zero threshold.
        if self.threshold <= 0.0 {
            fraction > 0.0
        } else {
            fraction >= self.threshold
        }
    }
}

struct ObserverInner {
    observations: SlotMap<ObservationId, ObservationEntry>,
    by_element: rustc_hash::FxHashMap<ElementId, ObservationId>,
}

/// Observes host elements crossing into the visible viewport
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct ViewportObserver {
    inner: Arc<Mutex<ObserverInner>>,
    probe: Option<Arc<dyn ViewportProbe>>,
    /// One fail-open warning per observer, not per observation
    warned_detached: Arc<AtomicBool>,
}

impl ViewportObserver {
    /// Create an observer backed by an intersection probe
    pub fn new(probe: Arc<dyn ViewportProbe>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverInner {
                observations: SlotMap::with_key(),
                by_element: rustc_hash::FxHashMap::default(),
            })),
            probe: Some(probe),
            warned_detached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an observer with no intersection capability
    ///
    /// Fail-open: every observation reports intersecting immediately and
    /// latches visible. Content must never be stuck hidden because the
    /// host cannot tell us where the viewport is.
    pub fn detached() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverInner {
                observations: SlotMap::with_key(),
                by_element: rustc_hash::FxHashMap::default(),
            })),
            probe: None,
            warned_detached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an intersection capability is present
    pub fn has_probe(&self) -> bool {
        self.probe.is_some()
    }

    /// Begin observing `element` with an intersection threshold
    ///
    /// Re-observing an element already under observation returns another
    /// handle to the same entry; the first registration's threshold wins.
    pub fn observe(
        &self,
        element: ElementId,
        threshold: f32,
    ) -> Result<Observation, ConfigError> {
        let threshold = ConfigError::check_threshold(threshold)?;

        let id = {
            let mut inner = self.inner.lock().unwrap();

            if let Some(&id) = inner.by_element.get(&element) {
                let entry = &mut inner.observations[id];
                entry.handles += 1;
                if (entry.threshold - threshold).abs() > f32::EPSILON {
                    tracing::debug!(
                        element = element.to_raw(),
                        "element already observed, keeping threshold {}",
                        entry.threshold
                    );
                }
                return Ok(Observation::new(Arc::downgrade(&self.inner), id));
            }

            let detached = self.probe.is_none();
            let id = inner.observations.insert(ObservationEntry {
                element,
                threshold,
                latest: detached,
                ever_visible: detached,
                handles: 1,
                next_sink: 0,
                sinks: SmallVec::new(),
                probe_sub: None,
            });
            inner.by_element.insert(element, id);
            id
        };

        match &self.probe {
            Some(probe) => {
                // Subscribe outside the registry lock: the probe pushes the
                // current reading synchronously, which re-enters deliver().
                let weak = Arc::downgrade(&self.inner);
                let sub = probe.subscribe(
                    element,
                    Arc::new(move |fraction| deliver(&weak, id, fraction)),
                );

                let mut inner = self.inner.lock().unwrap();
                if let Some(entry) = inner.observations.get_mut(id) {
                    entry.probe_sub = Some(sub);
                }
            }
            None => {
                if !self.warned_detached.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        "no viewport intersection capability; treating every element as visible"
                    );
                }
            }
        }

        Ok(Observation::new(Arc::downgrade(&self.inner), id))
    }

    /// Number of elements currently under observation
    pub fn observation_count(&self) -> usize {
        self.inner.lock().unwrap().observations.len()
    }
}

/// Route a probe fraction reading to an entry, coalescing to the latest
/// state and notifying sinks only on a flip
fn deliver(inner: &Weak<Mutex<ObserverInner>>, id: ObservationId, fraction: f32) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let (intersecting, callbacks) = {
        let mut guard = inner.lock().unwrap();
        let Some(entry) = guard.observations.get_mut(id) else {
            return;
        };

        let intersecting = entry.intersecting(fraction);
        if intersecting == entry.latest {
            return;
        }
        entry.latest = intersecting;
        entry.ever_visible |= intersecting;

        let callbacks: SmallVec<[ReadingCallback; 2]> =
            entry.sinks.iter().map(|(_, cb)| cb.clone()).collect();
        (intersecting, callbacks)
    };

    // Invoke outside the lock so a callback may observe/unobserve freely
    for callback in callbacks {
        callback(intersecting);
    }
}

/// RAII handle to one element's observation
///
/// Dropping the last handle for an element releases the underlying probe
/// subscription and removes the registry entry.
pub struct Observation {
    inner: Weak<Mutex<ObserverInner>>,
    id: ObservationId,
    sink_ids: Vec<u64>,
}

impl Observation {
    fn new(inner: Weak<Mutex<ObserverInner>>, id: ObservationId) -> Self {
        Self {
            inner,
            id,
            sink_ids: Vec::new(),
        }
    }

    /// The element under observation
    pub fn element(&self) -> Option<ElementId> {
        let inner = self.inner.upgrade()?;
        let guard = inner.lock().unwrap();
        guard.observations.get(self.id).map(|e| e.element)
    }

    /// Latest coalesced intersection reading
    pub fn is_intersecting(&self) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                let guard = inner.lock().unwrap();
                guard.observations.get(self.id).map(|e| e.latest)
            })
            .unwrap_or(false)
    }

    /// Whether the element has ever been intersecting
    pub fn has_been_visible(&self) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                let guard = inner.lock().unwrap();
                guard.observations.get(self.id).map(|e| e.ever_visible)
            })
            .unwrap_or(false)
    }

    /// Subscribe to reading flips
    ///
    /// The callback is invoked immediately with the current reading, then
    /// once per subsequent flip. It is removed when this handle drops.
    pub fn subscribe(&mut self, callback: impl Fn(bool) + Send + Sync + 'static) {
        let callback: ReadingCallback = Arc::new(callback);

        let current = {
            let Some(inner) = self.inner.upgrade() else {
                return;
            };
            let mut guard = inner.lock().unwrap();
            let Some(entry) = guard.observations.get_mut(self.id) else {
                return;
            };
            let sink_id = entry.next_sink;
            entry.next_sink += 1;
            entry.sinks.push((sink_id, callback.clone()));
            self.sink_ids.push(sink_id);
            entry.latest
        };

        callback(current);
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut guard = inner.lock().unwrap();

        let last_handle = {
            let Some(entry) = guard.observations.get_mut(self.id) else {
                return;
            };
            entry
                .sinks
                .retain(|(sink_id, _)| !self.sink_ids.contains(sink_id));
            entry.handles -= 1;
            entry.handles == 0
        };

        if last_handle {
            if let Some(entry) = guard.observations.remove(self.id) {
                guard.by_element.remove(&entry.element);
                // Dropping the probe subscription cancels delivery
                drop(entry.probe_sub);
                tracing::trace!(element = entry.element.to_raw(), "observation released");
            }
        }
    }
}

impl std::fmt::Debug for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observation")
            .field("intersecting", &self.is_intersecting())
            .field("ever_visible", &self.has_been_visible())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsProbe;
    use inview_core::Rect;
    use std::sync::Mutex as StdMutex;

    fn setup() -> (Arc<BoundsProbe>, ViewportObserver) {
        let probe = Arc::new(BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0)));
        let observer = ViewportObserver::new(probe.clone());
        (probe, observer)
    }

    #[test]
    fn test_observe_reports_initial_reading() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);

        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));
        let on_screen = observer.observe(element, 0.1).unwrap();
        assert!(on_screen.is_intersecting());
        assert_eq!(on_screen.element(), Some(element));

        let off = ElementId::new(2);
        probe.update_bounds(off, Rect::new(0.0, 2000.0, 100.0, 100.0));
        let off_screen = observer.observe(off, 0.1).unwrap();
        assert!(!off_screen.is_intersecting());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let (_probe, observer) = setup();
        let err = observer.observe(ElementId::new(1), 1.5).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
    }

    #[test]
    fn test_reobserve_is_idempotent() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));

        let a = observer.observe(element, 0.1).unwrap();
        let b = observer.observe(element, 0.1).unwrap();

        // One registry entry, one probe subscription
        assert_eq!(observer.observation_count(), 1);
        assert_eq!(probe.subscriber_count(element), 1);

        drop(a);
        assert_eq!(observer.observation_count(), 1);
        drop(b);
        assert_eq!(observer.observation_count(), 0);
        assert_eq!(probe.subscriber_count(element), 0);
    }

    #[test]
    fn test_latest_reading_wins() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));

        let observation = observer.observe(element, 0.1).unwrap();

        // Rapid oscillation: only the final position matters
        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));
        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));

        assert!(observation.is_intersecting());
        assert!(observation.has_been_visible());
    }

    #[test]
    fn test_subscriber_notified_only_on_flip() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));

        let mut observation = observer.observe(element, 0.1).unwrap();
        let readings = Arc::new(StdMutex::new(Vec::new()));
        let sink = readings.clone();
        observation.subscribe(move |reading| sink.lock().unwrap().push(reading));

        // Immediate reading, then two moves inside the viewport (one flip)
        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));
        probe.update_bounds(element, Rect::new(0.0, 150.0, 100.0, 100.0));
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));

        assert_eq!(*readings.lock().unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_release_stops_delivery() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));

        let readings = Arc::new(StdMutex::new(Vec::new()));
        {
            let mut observation = observer.observe(element, 0.1).unwrap();
            let sink = readings.clone();
            observation.subscribe(move |reading| sink.lock().unwrap().push(reading));
        }

        // Handle dropped: further probe updates must not call the sink
        probe.update_bounds(element, Rect::new(0.0, 100.0, 100.0, 100.0));
        assert_eq!(*readings.lock().unwrap(), vec![false]);
        assert_eq!(observer.observation_count(), 0);
    }

    #[test]
    fn test_detached_observer_fails_open() {
        let observer = ViewportObserver::detached();
        assert!(!observer.has_probe());

        let mut observation = observer.observe(ElementId::new(1), 0.1).unwrap();

        assert!(observation.is_intersecting());
        assert!(observation.has_been_visible());

        let readings = Arc::new(StdMutex::new(Vec::new()));
        let sink = readings.clone();
        observation.subscribe(move |reading| sink.lock().unwrap().push(reading));
        assert_eq!(*readings.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_threshold_zero_requires_overlap() {
        let (probe, observer) = setup();
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 2000.0, 100.0, 100.0));

        let observation = observer.observe(element, 0.0).unwrap();
        assert!(!observation.is_intersecting());

        // A sliver of overlap is enough at threshold 0
        probe.update_bounds(element, Rect::new(0.0, 799.0, 100.0, 100.0));
        assert!(observation.is_intersecting());
    }

    #[test]
    fn test_elements_are_independent() {
        let (probe, observer) = setup();
        let a = ElementId::new(1);
        let b = ElementId::new(2);
        probe.update_bounds(a, Rect::new(0.0, 100.0, 100.0, 100.0));
        probe.update_bounds(b, Rect::new(0.0, 2000.0, 100.0, 100.0));

        let obs_a = observer.observe(a, 0.1).unwrap();
        let obs_b = observer.observe(b, 0.1).unwrap();

        assert!(obs_a.is_intersecting());
        assert!(!obs_b.is_intersecting());

        probe.update_bounds(b, Rect::new(0.0, 200.0, 100.0, 100.0));
        assert!(obs_a.is_intersecting());
        assert!(obs_b.is_intersecting());
    }
}
