use crate::sync::atomic::Ordering::AcqRel;
use crate::util::marker::PhantomUnsync;
use std::ptr::NonNull;

#[doc(inline)]
pub use crate::error::FullError;

mod inner;
use inner::Inner;


/// Creates a bounded SPSC queue with storage for `capacity` elements.
///
/// One extra slot is allocated internally so that a full buffer and an
/// empty buffer stay distinguishable without shared bookkeeping; the
/// declared `capacity` is exactly how many elements fit. A `capacity`
/// of zero is allowed and yields a buffer that is permanently full.
///
/// # Panics
///
/// The function panics if it can't allocate the memory needed for the
/// buffer.
pub fn buffer<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let inner = NonNull::from(Box::leak(Box::new(Inner::<T>::new(capacity))));
    (
        Producer {
            inner,
            _unsync: PhantomUnsync {},
        },
        Consumer {
            inner,
            _unsync: PhantomUnsync {},
        },
    )
}

/// The enqueueing endpoint of a [`buffer`].
///
/// Data is added using the [`try_enqueue`](Producer::try_enqueue)
/// method.
pub struct Producer<T> {
    inner: NonNull<Inner<T>>,
    _unsync: PhantomUnsync,
}

/// The dequeueing endpoint of a [`buffer`].
///
/// Data is removed using the [`try_dequeue`](Consumer::try_dequeue)
/// method.
pub struct Consumer<T> {
    inner: NonNull<Inner<T>>,
    _unsync: PhantomUnsync,
}

impl<T> Producer<T> {
    /// Tries to place a value at the back of the buffer.
    ///
    /// Fails immediately when the buffer is full, returning the value
    /// inside the [`FullError`]; the buffer is left untouched and
    /// nothing blocks. Whether to retry, back off or drop the element
    /// is the caller's call.
    #[inline]
    pub fn try_enqueue(&self, item: T) -> Result<(), FullError<T>> {
        self.inner_ref().try_enqueue(item)
    }

    /// Checks if the buffer is empty. A snapshot, informational only.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner_ref().is_empty()
    }

    /// Checks if the buffer is full.
    ///
    /// On this endpoint a `false` is stable: only
    /// [`try_enqueue`](Producer::try_enqueue) on this same endpoint can
    /// fill the remaining space.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner_ref().is_full()
    }

    /// Returns the number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner_ref().capacity()
    }

    fn inner_ref(&self) -> &Inner<T> {
        /*SAFETY:
         *This type and Consumer are responsible for inner's lifetime.
         */
        unsafe { self.inner.as_ref() }
    }
}

impl<T> Consumer<T> {
    /// Removes and returns the value at the front of the buffer, or
    /// `None` if the buffer is empty.
    #[inline]
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.inner_ref().try_dequeue()
    }

    /// Removes and discards the value at the front of the buffer.
    ///
    /// Returns `false` if the buffer was empty.
    #[inline]
    pub fn pop(&mut self) -> bool {
        self.inner_ref().try_dequeue().is_some()
    }

    /// Borrows the value at the front of the buffer without removing
    /// it, or returns `None` if the buffer is empty.
    ///
    /// The borrow is released before the next
    /// [`try_dequeue`](Consumer::try_dequeue)/[`pop`](Consumer::pop)
    /// call, which take `&mut self`.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.inner_ref().peek()
    }

    /// Checks if the buffer is empty.
    ///
    /// On this endpoint a `false` is stable: only this endpoint removes
    /// elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner_ref().is_empty()
    }

    /// Checks if the buffer is full. A snapshot, informational only.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner_ref().is_full()
    }

    /// Returns the number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner_ref().capacity()
    }

    fn inner_ref(&self) -> &Inner<T> {
        /*SAFETY:
         *This type and Producer are responsible for inner's lifetime.
         */
        unsafe { self.inner.as_ref() }
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        //The other endpoint has already been dropped, we have to deallocate inner.
        if self.inner_ref().shared.drop_count.fetch_add(1, AcqRel) != 0 {
            drop(unsafe {
                /*SAFETY:
                 *inner is created with a Box in buffer().
                 */
                Box::from_raw(self.inner.as_ptr())
            });
        }
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        //The other endpoint has already been dropped, we have to deallocate inner.
        if self.inner_ref().shared.drop_count.fetch_add(1, AcqRel) != 0 {
            drop(unsafe {
                /*SAFETY:
                 *inner is created with a Box in buffer().
                 */
                Box::from_raw(self.inner.as_ptr())
            });
        }
    }
}

/*SAFETY:
 * Each endpoint confines its role's plain-cell state (the index
 * caches) to itself, and neither type is Sync or Clone, so one thread
 * per role is guaranteed.
 */
unsafe impl<T: Send> Send for Producer<T> {}
unsafe impl<T: Send> Send for Consumer<T> {}
