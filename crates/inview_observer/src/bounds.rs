//! Bounds-driven intersection probe
//!
//! A concrete [`ViewportProbe`] for hosts that already track layout bounds:
//! the host pushes the viewport rectangle and per-element bounds, and the
//! probe converts them into visible-fraction readings for subscribers.
//!
//! Elements with no reported bounds read as fraction 0.0 (off-screen) until
//! the host pushes their first rectangle.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, Weak};

use inview_core::{ElementId, ProbeSink, ProbeSubscription, Rect, ViewportProbe};

struct BoundsInner {
    viewport: Rect,
    bounds: FxHashMap<ElementId, Rect>,
    subscribers: FxHashMap<ElementId, Vec<(u64, ProbeSink)>>,
    next_sub: u64,
}

impl BoundsInner {
    fn fraction(&self, element: ElementId) -> f32 {
        self.bounds
            .get(&element)
            .map(|rect| rect.visible_fraction(&self.viewport))
            .unwrap_or(0.0)
    }
}

/// Intersection probe fed by host-pushed rectangles
pub struct BoundsProbe {
    inner: Arc<Mutex<BoundsInner>>,
}

impl BoundsProbe {
    pub fn new(viewport: Rect) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoundsInner {
                viewport,
                bounds: FxHashMap::default(),
                subscribers: FxHashMap::default(),
                next_sub: 0,
            })),
        }
    }

    /// Replace the viewport rect (scroll or resize) and re-read every
    /// subscribed element
    pub fn set_viewport(&self, viewport: Rect) {
        let pushes = {
            let mut inner = self.inner.lock().unwrap();
            inner.viewport = viewport;

            let mut pushes: Vec<(ProbeSink, f32)> = Vec::new();
            for (&element, sinks) in &inner.subscribers {
                let fraction = inner.fraction(element);
                for (_, sink) in sinks {
                    pushes.push((sink.clone(), fraction));
                }
            }
            pushes
        };

        // Deliver outside the lock: sinks re-enter the observer registry
        for (sink, fraction) in pushes {
            sink(fraction);
        }
    }

    /// Update one element's bounds and re-read it
    pub fn update_bounds(&self, element: ElementId, bounds: Rect) {
        let pushes = {
            let mut inner = self.inner.lock().unwrap();
            inner.bounds.insert(element, bounds);

            let fraction = inner.fraction(element);
            inner
                .subscribers
                .get(&element)
                .map(|sinks| {
                    sinks
                        .iter()
                        .map(|(_, sink)| (sink.clone(), fraction))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        };

        for (sink, fraction) in pushes {
            sink(fraction);
        }
    }

    /// Forget an element's bounds (it reads as off-screen again)
    pub fn remove_bounds(&self, element: ElementId) {
        let pushes = {
            let mut inner = self.inner.lock().unwrap();
            if inner.bounds.remove(&element).is_none() {
                return;
            }
            inner
                .subscribers
                .get(&element)
                .map(|sinks| sinks.iter().map(|(_, sink)| sink.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        };

        for sink in pushes {
            sink(0.0);
        }
    }

    /// The current viewport rect
    pub fn viewport(&self) -> Rect {
        self.inner.lock().unwrap().viewport
    }

    /// Number of active subscriptions for an element
    pub fn subscriber_count(&self, element: ElementId) -> usize {
        self.inner
            .lock()
            .unwrap()
            .subscribers
            .get(&element)
            .map(|sinks| sinks.len())
            .unwrap_or(0)
    }
}

impl ViewportProbe for BoundsProbe {
    fn subscribe(&self, target: ElementId, sink: ProbeSink) -> ProbeSubscription {
        let (sub_id, fraction) = {
            let mut inner = self.inner.lock().unwrap();
            let sub_id = inner.next_sub;
            inner.next_sub += 1;
            inner
                .subscribers
                .entry(target)
                .or_default()
                .push((sub_id, sink.clone()));
            (sub_id, inner.fraction(target))
        };

        // Push the current reading so new observations resolve immediately
        sink(fraction);

        let weak: Weak<Mutex<BoundsInner>> = Arc::downgrade(&self.inner);
        ProbeSubscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut guard = inner.lock().unwrap();
            if let Some(sinks) = guard.subscribers.get_mut(&target) {
                sinks.retain(|(id, _)| *id != sub_id);
                if sinks.is_empty() {
                    guard.subscribers.remove(&target);
                }
            }
            tracing::trace!(element = target.to_raw(), "probe subscription released");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn collecting_sink() -> (ProbeSink, Arc<StdMutex<Vec<f32>>>) {
        let readings = Arc::new(StdMutex::new(Vec::new()));
        let sink_readings = readings.clone();
        let sink: ProbeSink = Arc::new(move |fraction| {
            sink_readings.lock().unwrap().push(fraction);
        });
        (sink, readings)
    }

    #[test]
    fn test_subscribe_pushes_current_reading() {
        let probe = BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 0.0, 100.0, 100.0));

        let (sink, readings) = collecting_sink();
        let _sub = probe.subscribe(element, sink);

        assert_eq!(*readings.lock().unwrap(), vec![1.0]);
    }

    #[test]
    fn test_unknown_element_reads_off_screen() {
        let probe = BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let (sink, readings) = collecting_sink();
        let _sub = probe.subscribe(ElementId::new(9), sink);

        assert_eq!(*readings.lock().unwrap(), vec![0.0]);
    }

    #[test]
    fn test_viewport_scroll_updates_fractions() {
        let probe = BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 1000.0, 100.0, 200.0));

        let (sink, readings) = collecting_sink();
        let _sub = probe.subscribe(element, sink);

        // Scroll down 400px: the element's top half enters the viewport
        probe.set_viewport(Rect::new(0.0, 400.0, 1000.0, 800.0));

        let readings = readings.lock().unwrap();
        assert_eq!(readings[0], 0.0);
        assert!((readings[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_drop_subscription_stops_delivery() {
        let probe = BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let element = ElementId::new(1);

        let (sink, readings) = collecting_sink();
        let sub = probe.subscribe(element, sink);
        assert_eq!(probe.subscriber_count(element), 1);

        drop(sub);
        assert_eq!(probe.subscriber_count(element), 0);

        probe.update_bounds(element, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(*readings.lock().unwrap(), vec![0.0]);
    }

    #[test]
    fn test_remove_bounds_reads_off_screen() {
        let probe = BoundsProbe::new(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let element = ElementId::new(1);
        probe.update_bounds(element, Rect::new(0.0, 0.0, 100.0, 100.0));

        let (sink, readings) = collecting_sink();
        let _sub = probe.subscribe(element, sink);

        probe.remove_bounds(element);
        assert_eq!(*readings.lock().unwrap(), vec![1.0, 0.0]);
    }
}
