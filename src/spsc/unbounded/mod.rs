mod inner;

#[cfg(test)]
mod tests;

/// Creates an unbounded SPSC queue.
///
/// The [`Producer`] and [`Consumer`] returned are the only two handles
/// to the queue; each may be moved to its own thread. Storage grows as
/// needed and consumed nodes are recycled, so enqueueing never fails.
///
/// # Panics
///
/// Operations on the queue panic if node storage can't be allocated.
pub fn queue<T>() -> (Producer<T>, Consumer<T>) {
    let (h1, h2) = inner::Inner::<T>::allocate();
    (Producer(h1), Consumer(h2))
}

/// The enqueueing endpoint of a [`queue`].
pub struct Producer<T>(inner::InnerHolder<T>);

/// The dequeueing endpoint of a [`queue`].
pub struct Consumer<T>(inner::InnerHolder<T>);

impl<T> Producer<T> {
    /// Appends a value at the back of the queue.
    ///
    /// Always succeeds; the queue grows as needed.
    #[inline]
    pub fn enqueue(&self, item: T) {
        self.0.enqueue(item)
    }

    /// Checks if the queue looks empty from this side.
    ///
    /// A snapshot: the [`Consumer`] may be dequeueing concurrently, so
    /// by the time the result is inspected it may be stale. Useful for
    /// reporting, never for synchronisation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Consumer<T> {
    /// Removes and returns the value at the front of the queue, or
    /// `None` if the queue is empty.
    #[inline]
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.0.try_dequeue()
    }

    /// Removes and discards the value at the front of the queue.
    ///
    /// Returns `false` if the queue was empty.
    #[inline]
    pub fn pop(&mut self) -> bool {
        self.0.try_dequeue().is_some()
    }

    /// Borrows the value at the front of the queue without removing it,
    /// or returns `None` if the queue is empty.
    ///
    /// The borrow is released before the next
    /// [`try_dequeue`](Consumer::try_dequeue)/[`pop`](Consumer::pop)
    /// call, which take `&mut self`.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.0.peek()
    }

    /// Checks if the queue is empty.
    ///
    /// On this endpoint the answer only turns stale in one direction:
    /// the [`Producer`] may append right after a `true`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/*SAFETY:
 * Each endpoint confines its role's plain-cell state to itself: the
 * shared Inner is written through atomics except for the producer-only
 * Cells, which only Producer touches. Neither type is Sync or Clone,
 * so one thread per role is guaranteed.
 */
unsafe impl<T: Send> Send for Producer<T> {}
unsafe impl<T: Send> Send for Consumer<T> {}
