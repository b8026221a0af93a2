//! Host element identity
//!
//! The reveal system does not own a visual tree; the host hands it opaque
//! element ids. Ids are plain `u64` newtypes so hosts can mint them from
//! their own node keys, or use [`ElementIdGenerator`] when they have none.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier for a host visual element observed by the viewport system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Convert to raw u64 for storage
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Reconstruct from raw u64
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Monotonic generator for element ids
#[derive(Debug, Default)]
pub struct ElementIdGenerator {
    next: AtomicU64,
}

impl ElementIdGenerator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> ElementId {
        ElementId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
