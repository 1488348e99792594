/// A bounded lock-free Single Producer Single Consumer queue.
///
/// A fixed capacity circular buffer for sending from a producer thread
/// to a consumer thread. Only one thread may enqueue and only one may
/// dequeue at any given time. Enqueueing into a full buffer fails
/// immediately and hands the element back; nothing ever blocks.
///
/// # Example
///
/// ```
/// use readerwriter_qs::spsc::bounded;
/// use std::thread;
/// fn main() {
///     let (src, mut sink) = bounded::buffer::<&'static str>(8);
///
///     thread::spawn(move || {
///         src.try_enqueue("H").unwrap();
///         src.try_enqueue("E").unwrap();
///         src.try_enqueue("L").unwrap();
///         src.try_enqueue("L").unwrap();
///         src.try_enqueue("O").unwrap();
///     });
///     let mut str = String::new();
///     while str.len() < 5 {
///         match sink.try_dequeue() {
///             Some(s) => str.push_str(s),
///             None => {/*sophisticated back-off policy*/},
///         }
///     }
///
///     assert_eq!(str, "HELLO");
/// }
/// ```
///
/// # Cross-platform notes
///
/// This implementation depends only on pointer-sized atomics.
#[cfg(any(doc, feature = "spsc-bounded"))]
#[cfg(target_has_atomic = "ptr")]
pub mod bounded;

/// An unbounded lock-free Single Producer Single Consumer queue.
///
/// A non-blocking queue over a linked chain of nodes. Enqueues always
/// succeed; dequeues, like everything else here, never block. The head
/// of the chain is anchored by a dummy node and both ends are moved by
/// compare-and-swap on `{node, counter}` values exchanged as a single
/// word, so a node reclaimed and reused for a later element is never
/// mistaken for its former self.
///
/// # Example
///
/// ```
/// use readerwriter_qs::spsc::unbounded;
/// use std::thread;
/// fn main() {
///     let (src, mut sink) = unbounded::queue::<u8>();
///
///     thread::spawn(move || {
///         for i in 0..10 {
///             src.enqueue(i);
///         }
///     });
///     for i in 0..10 {
///         loop {
///             if let Some(v) = sink.try_dequeue() {
///                 assert_eq!(v, i);
///                 break;
///             }
///         }
///     }
/// }
/// ```
///
/// # Cross-platform notes
///
/// This implementation depends on 64-bit atomics.
#[cfg(any(doc, feature = "spsc-unbounded"))]
#[cfg(target_has_atomic = "64")]
pub mod unbounded;
