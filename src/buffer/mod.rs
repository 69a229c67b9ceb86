//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between access methods and
//! disk. It owns a fixed arena of frames, each holding one page, and
//! delegates eviction decisions to a pluggable replacement policy.
//!
//! # Components
//! - [`BufferPool`] - the page cache and pin/unpin/flush orchestrator
//! - [`FrameDescriptor`] - per-frame metadata (pin count, dirty flag, state)
//! - [`policy`] - the [`ReplacementPolicy`] trait and CLOCK/FIFO/LRU
//! - [`UsageStats`] - hit/load/eviction accounting
//!
//! [`ReplacementPolicy`]: policy::ReplacementPolicy

mod buffer_pool;
mod frame;
pub mod policy;
mod stats;

pub use buffer_pool::{BufferPool, PinMode, UnpinMode};
pub use frame::{FrameDescriptor, FrameState};
pub use stats::{PageCounters, UsageStats};
