use std::error::Error;
use std::fmt;

/// Error for the `try_enqueue` method of a bounded `Producer`.
///
/// The available bounded `Producer`s are:
/// - [spsc::bounded::Producer](crate::spsc::bounded::Producer)
///
/// Returned when the buffer already holds `capacity` elements. The
/// buffer is left untouched and the rejected element is handed back
/// inside the error, so the caller decides whether to retry or drop it.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct FullError<T>(pub T);

impl<T> FullError<T> {
    /// Consumes the error, returning the element that failed to enqueue.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Error for FullError<T> {}

impl<T> fmt::Display for FullError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("enqueueing to a full buffer")
    }
}

impl<T> fmt::Debug for FullError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FullError(..)")
    }
}
