use std::ops::{Deref, DerefMut};

/// Aligns the wrapped value to 128 bytes.
///
/// Used to keep the producer-written and consumer-written parts of a
/// queue on separate cache lines. 128 instead of 64 because some
/// processors prefetch cache lines in pairs.
#[derive(Default)]
#[repr(align(128))]
pub(crate) struct CacheAligned<T>(T);

impl<T> CacheAligned<T> {
    pub(crate) fn new(val: T) -> Self {
        Self(val)
    }
}

impl<T> Deref for CacheAligned<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for CacheAligned<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}
