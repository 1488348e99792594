use crate::cell::UnsafeCell;
use crate::error::FullError;
use crate::sync::atomic::AtomicUsize;
use crate::sync::atomic::Ordering::{Acquire, Release};
use crate::util::CacheAligned;
use std::cell::Cell;
use std::mem::MaybeUninit;

/*
 * A circular buffer of `capacity + 1` slots. One slot is sacrificed so
 * that `head == tail` always means empty and `tail + 1 == head` (mod
 * slot count) always means full, with no element counter to share.
 *
 * `tail` is written only by the producer, `head` only by the consumer;
 * each side reads its own index unsynchronised and the other side's
 * with Acquire. No CAS anywhere.
 */
#[repr(C)]
pub(super) struct Inner<T> {
    producer: CacheAligned<ProducerData>,
    consumer: CacheAligned<ConsumerData>,
    pub(super) shared: SharedData<T>,
}

impl<T> Inner<T> {
    pub(super) fn new(capacity: usize) -> Self {
        let slots = capacity.checked_add(1).expect("capacity overflow");
        #[cfg(not(feature = "loom"))]
        let buffer = {
            let mut vec = Vec::with_capacity(slots);
            /*SAFETY:
             *elements are MaybeUninit, so uninitialised
             *data is a valid value for them.
             */
            unsafe { vec.set_len(slots) };
            vec.into_boxed_slice()
        };
        /*
        !!!IMPORTANT!!!

        In loom, UnsafeCell::new(MaybeUninit::uninit()) isn't uninitialised.
        It initialises extra fields used for keeping track of accesses to
        the cell.

        !!!DO NOT DELETE THE CODE BELOW!!!
        */
        #[cfg(feature = "loom")]
        let buffer = (0..slots)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Box<[UnsafeCell<MaybeUninit<T>>]>>();
        Self {
            producer: CacheAligned::default(),
            consumer: CacheAligned::default(),
            shared: SharedData {
                buffer,
                drop_count: AtomicUsize::default(),
            },
        }
    }

    pub(super) fn try_enqueue(&self, item: T) -> Result<(), FullError<T>> {
        /*SAFETY:
         *tail is only modified by try_enqueue and this is
         *an SPSC, so no other thread is modifying it.
         */
        #[cfg(not(feature = "loom"))]
        let tail = unsafe { self.producer.tail.as_ptr().read() };
        #[cfg(feature = "loom")]
        let tail = unsafe { self.producer.tail.unsync_load() };

        let next = self.advance(tail);

        if next == self.producer.head_cache.get() {
            self.producer.head_cache.set(self.consumer.head.load(Acquire));

            /* The cache only ever runs behind the real head, and the
             * consumer only ever frees space, so a stale cache can
             * report "full" wrongly but never "not full" wrongly.
             */
            if next == self.producer.head_cache.get() {
                return Err(FullError(item));
            }
        }

        unsafe {
            /*SAFETY:
             *indices stay in [0, slot count), see `advance`.
             */
            let slot = self.shared.buffer.get_unchecked(tail);
            /*SAFETY:
             *the consumer only reads slots before `tail`, and the slot
             *is either uninit from Self::new() or already taken out.
             */
            slot.with_mut(|ptr| (ptr as *mut T).write(item));
        }
        self.producer.tail.store(next, Release);
        Ok(())
    }

    pub(super) fn try_dequeue(&self) -> Option<T> {
        /*SAFETY:
         *head is only modified by try_dequeue and this is
         *an SPSC, so no other thread is modifying it.
         */
        #[cfg(not(feature = "loom"))]
        let head = unsafe { self.consumer.head.as_ptr().read() };
        #[cfg(feature = "loom")]
        let head = unsafe { self.consumer.head.unsync_load() };

        if head == self.consumer.tail_cache.get() {
            self.consumer.tail_cache.set(self.producer.tail.load(Acquire));
            if head == self.consumer.tail_cache.get() {
                return None;
            }
        }

        let item = unsafe {
            /*SAFETY:
             *indices stay in [0, slot count), see `advance`.
             */
            let slot = self.shared.buffer.get_unchecked(head);
            /*SAFETY:
             *everything before tail has been written by the producer.
             */
            slot.with_mut(|ptr| (ptr as *mut T).read())
        };

        self.consumer.head.store(self.advance(head), Release);
        Some(item)
    }

    pub(super) fn peek(&self) -> Option<&T> {
        #[cfg(not(feature = "loom"))]
        let head = unsafe { self.consumer.head.as_ptr().read() };
        #[cfg(feature = "loom")]
        let head = unsafe { self.consumer.head.unsync_load() };

        if head == self.consumer.tail_cache.get() {
            self.consumer.tail_cache.set(self.producer.tail.load(Acquire));
            if head == self.consumer.tail_cache.get() {
                return None;
            }
        }

        /*SAFETY:
         * - everything before tail has been written by the producer
         * - only the consumer overwrites a slot it has dequeued, and the
         *   borrow ends before the next dequeue (peek borrows the
         *   Consumer shared, dequeues borrow it exclusively)
         */
        let slot = unsafe { self.shared.buffer.get_unchecked(head) };
        Some(slot.with(|ptr| unsafe { &*(ptr as *const T) }))
    }

    pub(super) fn is_empty(&self) -> bool {
        self.consumer.head.load(Acquire) == self.producer.tail.load(Acquire)
    }

    pub(super) fn is_full(&self) -> bool {
        self.advance(self.producer.tail.load(Acquire)) == self.consumer.head.load(Acquire)
    }

    pub(super) fn capacity(&self) -> usize {
        self.shared.buffer.len() - 1
    }

    #[inline(always)]
    fn advance(&self, idx: usize) -> usize {
        (idx + 1) % self.shared.buffer.len()
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        //head is the first not yet read slot
        //tail is the slot after the last written one
        /*SAFETY:
         *this object is being destroyed so we
         *have exclusive access to these atomics.
         */
        #[cfg(not(feature = "loom"))]
        let (mut head, tail) = unsafe {
            (
                self.consumer.head.as_ptr().read(),
                self.producer.tail.as_ptr().read(),
            )
        };
        #[cfg(feature = "loom")]
        let (mut head, tail) = unsafe {
            (
                self.consumer.head.unsync_load(),
                self.producer.tail.unsync_load(),
            )
        };

        let slots = self.shared.buffer.len();
        while head != tail {
            /*SAFETY:
             *all slots in [head, tail) have been written, but not read.
             */
            let slot = unsafe { self.shared.buffer.get_unchecked(head) };
            unsafe { slot.with_mut(|ptr| std::ptr::drop_in_place(ptr as *mut T)) };
            head = (head + 1) % slots;
        }
    }
}

struct ProducerData {
    tail: AtomicUsize,
    head_cache: Cell<usize>,
}

struct ConsumerData {
    head: AtomicUsize,
    tail_cache: Cell<usize>,
}

pub(super) struct SharedData<T> {
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    pub(super) drop_count: AtomicUsize, /*dropped endpoint count*/
}

impl Default for ProducerData {
    #[inline(always)]
    fn default() -> Self {
        Self {
            tail: AtomicUsize::default(),
            head_cache: Cell::default(),
        }
    }
}

impl Default for ConsumerData {
    #[inline(always)]
    fn default() -> Self {
        Self {
            head: AtomicUsize::default(),
            tail_cache: Cell::default(),
        }
    }
}
