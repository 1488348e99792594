//This type is used for `spsc::unbounded::queue`.
#![allow(dead_code)]
use crate::sync::atomic::{AtomicU64, Ordering};
use std::fmt::Debug;

/// The slot index meaning "no node".
pub(crate) const NIL: u32 = u32::MAX;

/// A `{slot index, modification counter}` pair packed into one `u64`.
///
/// The counter is bumped on every successful exchange of the field
/// holding the handle, so two `Tagged` values compare equal only if
/// both the node identity *and* its version match. A slot that was
/// reclaimed and reused under the same index therefore never passes a
/// comparison against a stale handle (the ABA problem).
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tagged(u64);

impl Tagged {
    pub(crate) const fn new(index: u32, count: u32) -> Self {
        Self(((count as u64) << 32) | index as u64)
    }

    /// A handle to no node, carrying `count`.
    pub(crate) const fn nil(count: u32) -> Self {
        Self::new(NIL, count)
    }

    pub(crate) fn index(self) -> u32 {
        self.0 as u32
    }

    pub(crate) fn count(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub(crate) fn is_nil(self) -> bool {
        self.index() == NIL
    }

    /// The handle designating `index` one exchange after `self`.
    pub(crate) fn bump(self, index: u32) -> Self {
        Self::new(index, self.count().wrapping_add(1))
    }
}

impl Debug for Tagged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tagged")
            .field("index", &self.index())
            .field("count", &self.count())
            .finish()
    }
}

/// A [`Tagged`] handle exchanged atomically as a whole.
///
/// Never exposes the underlying integer: every load, store and CAS
/// moves the index and the counter together.
pub(crate) struct AtomicTagged(AtomicU64);

impl AtomicTagged {
    pub(crate) fn new(val: Tagged) -> Self {
        Self(AtomicU64::new(val.0))
    }

    pub(crate) fn load(&self, ord: Ordering) -> Tagged {
        Tagged(self.0.load(ord))
    }

    pub(crate) fn store(&self, val: Tagged, ord: Ordering) {
        self.0.store(val.0, ord)
    }

    pub(crate) fn compare_exchange_weak(
        &self,
        current: Tagged,
        new: Tagged,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Tagged, Tagged> {
        self.0
            .compare_exchange_weak(current.0, new.0, success, failure)
            .map(Tagged)
            .map_err(Tagged)
    }

    pub(crate) fn with_mut<R>(&mut self, f: impl FnOnce(&mut u64) -> R) -> R {
        #[cfg(not(feature = "loom"))]
        return f(self.0.get_mut());
        #[cfg(feature = "loom")]
        return self.0.with_mut(f);
    }
}

impl Debug for AtomicTagged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&Tagged(self.0.load(Ordering::Relaxed)), f)
    }
}
