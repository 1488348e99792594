use crate::cell::UnsafeCell;
use crate::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};
use crate::sync::atomic::{AtomicPtr, AtomicUsize};

use crate::util::tagged::{AtomicTagged, Tagged, NIL};
use crate::util::CacheAligned;

use std::cell::Cell;
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

/*
 * unbounded::queue is a linked chain of slab slots anchored by a dummy:
 *
 * |<----- reclaimable ----->|<- dummy ->|<------ live values ------>|
 * `producer.reuse_cursor` -> ... `head` -> `head.next` ... -> `tail`
 *
 * `head` always designates an already-consumed node; the element at the
 * front of the queue lives in `head.next`. Chain edges and both ends
 * are `Tagged` handles: a slot index and a modification counter
 * exchanged as one 64-bit word, so a recycled slot never passes a CAS
 * against a stale snapshot.
 *
 * Ordering policy, per field:
 *
 * field        written by                read by
 * `tail`       CAS AcqRel (producer      Acquire (both sides)
 *              swing, consumer catch-up)
 * `head`       consumer CAS, Release     consumer Relaxed (own writes),
 *              on success                producer + `is_empty` Acquire
 * `slot.next`  producer store Release    consumer Acquire; producer
 *              (link), Relaxed (recycle  Relaxed (it wrote them)
 *              reset, published by the
 *              next link)
 * chunk ptrs   producer store Release    Acquire
 *
 * The producer's Acquire load of `head` is what makes recycling sound:
 * it orders every value read the consumer made before advancing `head`
 * ahead of the producer's reuse of the slot.
 */
pub(super) struct Inner<T> {
    producer: CacheAligned<ProducerData>,
    head: CacheAligned<AtomicTagged>,
    tail: CacheAligned<AtomicTagged>,
    slab: Slab<T>,
    // Counts dropped endpoints; the second one frees this Inner.
    pub(super) drop_count: AtomicUsize,
}

struct ProducerData {
    /// Next never-used slab index.
    fresh: Cell<u32>,
    /// Oldest consumed node not yet reclaimed.
    reuse_cursor: Cell<Tagged>,
    /// Last observed `head`.
    head_cache: Cell<Tagged>,
}

impl<T> Inner<T> {
    pub(super) fn allocate() -> (InnerHolder<T>, InnerHolder<T>) {
        let inner = NonNull::from(Box::leak(Box::new(Self::new())));
        (InnerHolder(inner), InnerHolder(inner))
    }

    fn new() -> Self {
        // slot 0 of the first chunk is the permanent initial dummy
        let dummy = Tagged::new(0, 0);
        Self {
            producer: CacheAligned::new(ProducerData {
                fresh: Cell::new(1),
                reuse_cursor: Cell::new(dummy),
                head_cache: Cell::new(dummy),
            }),
            head: CacheAligned::new(AtomicTagged::new(dummy)),
            tail: CacheAligned::new(AtomicTagged::new(dummy)),
            slab: Slab::new(),
            drop_count: AtomicUsize::new(0),
        }
    }

    pub(super) fn enqueue(&self, item: T) {
        let index = self.acquire_slot();
        let slot = self.slab.slot(index);
        slot.value.with_mut(|val| unsafe {
            /*SAFETY:
             * - slots from `acquire_slot` hold no live value
             * - MaybeUninit<T> has the same layout as T
             */
            (val as *mut T).write(item)
        });

        /* Link behind the current tail first, then swing the tail.
         * Swinging first would open a window where `head == tail` no
         * longer implies the queue end has been reached; linking first
         * only lets `tail` lag, which `try_dequeue` heals.
         */
        let tail = self.tail.load(Acquire);
        let prev = self.slab.slot(tail.index());
        let link = prev.next.load(Relaxed); // only the producer links
        debug_assert!(link.is_nil());
        prev.next.store(link.bump(index), Release);

        // The consumer may catch the tail up before we swing it. Each
        // retry observes strictly newer state and the loop ends as soon
        // as either side has published the new node as tail.
        let mut current = tail;
        loop {
            match self
                .tail
                .compare_exchange_weak(current, current.bump(index), AcqRel, Acquire)
            {
                Ok(_) => break,
                Err(seen) => {
                    if seen.index() == index {
                        break; // the consumer already swung it
                    }
                    current = seen;
                }
            }
        }
    }

    pub(super) fn try_dequeue(&self) -> Option<T> {
        loop {
            let head = self.head.load(Relaxed); // only this thread moves head
            let tail = self.tail.load(Acquire);
            let next = self.slab.slot(head.index()).next.load(Acquire);
            /* Snapshot guard: act only on a consistent {head, tail,
             * next} triple. Only the consumer moves `head`, so this can
             * fire solely after a spurious CAS failure below.
             */
            if head != self.head.load(Relaxed) {
                continue;
            }

            if head == tail {
                if next.is_nil() {
                    return None;
                }
                /* The producer linked a node but hasn't swung the tail
                 * yet. Catch it up to the node that is already linked
                 * instead of spinning: the retry after this CAS sees
                 * `head != tail` even if the producer never runs again.
                 */
                let _ = self.tail.compare_exchange_weak(
                    tail,
                    tail.bump(next.index()),
                    AcqRel,
                    Acquire,
                );
                continue;
            }

            // `tail` is ahead of `head`, so the dummy's link exists.
            debug_assert!(!next.is_nil());
            if self
                .head
                .compare_exchange_weak(head, head.bump(next.index()), Release, Relaxed)
                .is_err()
            {
                // spurious failure; there is no second consumer
                continue;
            }

            /* The old dummy now belongs to the producer, which reclaims
             * it after observing the new `head`. The node at `next`
             * became the dummy; its value is moved out exactly once,
             * here, and the producer can't touch the slot while `head`
             * designates it.
             */
            let slot = self.slab.slot(next.index());
            return Some(slot.value.with_mut(|val| unsafe {
                /*SAFETY: linked nodes hold initialised values*/
                (val as *mut T).read()
            }));
        }
    }

    pub(super) fn peek(&self) -> Option<&T> {
        let head = self.head.load(Relaxed);
        let next = self.slab.slot(head.index()).next.load(Acquire);
        if next.is_nil() {
            return None;
        }
        let slot = self.slab.slot(next.index());
        /*SAFETY:
         * - linked nodes hold initialised values
         * - only the consumer moves `head` or frees what it anchors, and
         *   peek runs on the consumer thread; the borrow ends before the
         *   next dequeue (`peek` borrows the Consumer shared, dequeues
         *   borrow it exclusively)
         */
        Some(slot.value.with(|val| unsafe { &*(val as *const T) }))
    }

    pub(super) fn is_empty(&self) -> bool {
        // empty iff the same tagged value anchors both ends and nothing
        // is linked after the dummy
        let head = self.head.load(Acquire);
        let tail = self.tail.load(Acquire);
        head == tail && self.slab.slot(head.index()).next.load(Acquire).is_nil()
    }

    fn acquire_slot(&self) -> u32 {
        if let Some(index) = self.recycle() {
            return index;
        }
        // refresh the view of head and retry before allocating
        self.producer.head_cache.set(self.head.load(Acquire));
        match self.recycle() {
            Some(index) => index,
            None => self.fresh_slot(),
        }
    }

    /// Reclaims the oldest consumed node, if the cached view of `head`
    /// has already moved past it.
    fn recycle(&self) -> Option<u32> {
        let cursor = self.producer.reuse_cursor.get();
        if cursor.index() == self.producer.head_cache.get().index() {
            return None;
        }
        let slot = self.slab.slot(cursor.index());
        // nodes behind `head` keep their links until reclaimed here
        let next = slot.next.load(Relaxed);
        debug_assert!(!next.is_nil());
        self.producer.reuse_cursor.set(next);
        // Retire the old link: handles minted for this slot from now on
        // never compare equal to one a stale snapshot may still hold.
        slot.next.store(next.bump(NIL), Relaxed);
        Some(cursor.index())
    }

    fn fresh_slot(&self) -> u32 {
        let index = self.producer.fresh.get();
        assert!(index != NIL, "node index space exhausted");
        let (chunk, offset) = Slab::<T>::locate(index);
        if chunk != 0 && offset == 0 {
            self.slab.grow(chunk);
        }
        self.producer.fresh.set(index + 1);
        index
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        /* Values still queued sit strictly after the dummy at `head`.
         * Exclusive access here, so Relaxed loads suffice and nothing
         * races the drops. The slab frees the slots themselves.
         */
        let head = self.head.load(Relaxed);
        let mut current = self.slab.slot(head.index()).next.load(Relaxed);
        while !current.is_nil() {
            let slot = self.slab.slot(current.index());
            slot.value.with_mut(|val| unsafe {
                /*SAFETY: nodes reachable from `head` hold initialised values*/
                (val as *mut T).drop_in_place()
            });
            current = slot.next.load(Relaxed);
        }
    }
}

/// Slots per first chunk; chunk `k` holds `FIRST_CHUNK << k` slots.
const FIRST_CHUNK: usize = 32;
const CHUNKS: usize = 32;

struct Slot<T> {
    next: AtomicTagged,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            next: AtomicTagged::new(Tagged::nil(0)),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Append-only arena of slots addressed by `u32` index.
///
/// Chunks double in size, are only ever added (by the producer) and
/// never move, so a handle stays valid for the arena's whole life.
struct Slab<T> {
    chunks: [AtomicPtr<Slot<T>>; CHUNKS],
}

impl<T> Slab<T> {
    fn new() -> Self {
        let this = Self {
            chunks: std::array::from_fn(|_| AtomicPtr::new(ptr::null_mut())),
        };
        this.grow(0);
        this
    }

    /// Chunk index and in-chunk offset of `index`.
    fn locate(index: u32) -> (usize, usize) {
        let i = index as usize;
        let d = i / FIRST_CHUNK + 1;
        let chunk = (usize::BITS - 1 - d.leading_zeros()) as usize;
        (chunk, i - ((1 << chunk) - 1) * FIRST_CHUNK)
    }

    fn chunk_len(chunk: usize) -> usize {
        FIRST_CHUNK << chunk
    }

    /// Publishes a fresh chunk. Called by the producer only.
    fn grow(&self, chunk: usize) {
        /*
        !!!IMPORTANT!!!

        In loom, UnsafeCell::new(MaybeUninit::uninit()) isn't uninitialised
        memory. It initialises extra fields used for keeping track of
        accesses to the cell, so the slots must be built one by one.
        */
        let slots = (0..Self::chunk_len(chunk))
            .map(|_| Slot::new())
            .collect::<Box<[Slot<T>]>>();
        self.chunks[chunk].store(Box::into_raw(slots) as *mut Slot<T>, Release);
    }

    fn slot(&self, index: u32) -> &Slot<T> {
        let (chunk, offset) = Self::locate(index);
        // published with Release by `grow` before any handle into the
        // chunk exists
        let base = self.chunks[chunk].load(Acquire);
        debug_assert!(!base.is_null());
        /*SAFETY:
         * - `locate` keeps `offset` within the chunk
         * - chunks live until Slab::drop
         */
        unsafe { &*base.add(offset) }
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        for (chunk, slot_ptr) in self.chunks.iter_mut().enumerate() {
            // exclusive access; chunks are allocated in order
            let base = slot_ptr.load(Relaxed);
            if base.is_null() {
                break;
            }
            drop(unsafe {
                /*SAFETY: allocated by `grow` with this exact length*/
                Box::from_raw(ptr::slice_from_raw_parts_mut(
                    base,
                    Self::chunk_len(chunk),
                ))
            });
        }
    }
}

pub(super) struct InnerHolder<T>(NonNull<Inner<T>>);

impl<T> core::ops::Deref for InnerHolder<T> {
    type Target = Inner<T>;
    fn deref(&self) -> &Self::Target {
        //SAFETY: Valid at least until InnerHolder::drop
        unsafe { self.0.as_ref() }
    }
}

impl<T> Drop for InnerHolder<T> {
    fn drop(&mut self) {
        // the first endpoint to go only marks itself gone
        if self.drop_count.fetch_add(1, AcqRel) == 1 {
            drop(unsafe {
                /*SAFETY: allocated with a Box in Inner::allocate, happens once*/
                Box::from_raw(self.0.as_ptr())
            });
        }
    }
}
