//! Corp stats services.
//!
//! Services borrow their collaborators and compose repositories, the roster source and the
//! identity graph into the operations exposed to the scheduler and to callers.

pub mod refresh;
pub mod stats;
pub mod sync;
pub mod unit;

/// Maximum name resolution batches in flight during a sync.
pub const MAX_CONCURRENT_NAME_BATCHES: usize = 4;

/// Maximum ship type lookups in flight during a sync.
pub const MAX_CONCURRENT_TYPE_LOOKUPS: usize = 10;

/// Maximum units refreshed concurrently by a full refresh.
pub const MAX_CONCURRENT_UNIT_REFRESHES: usize = 5;
