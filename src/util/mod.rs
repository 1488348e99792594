mod cache;
pub(crate) mod marker;
#[cfg(target_has_atomic = "64")]
pub(crate) mod tagged;

pub(crate) use cache::CacheAligned;
