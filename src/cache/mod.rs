//! In-memory memoization for expensive accessors.
//!
//! This module knows nothing about Crowdin. `CacheSlot` is a lazily filled
//! slot that fetches at most once until cleared.

mod slot;

pub use slot::{CacheSlot, SlotGuard};
