//! Page-replacement policies.
//!
//! The pool depends only on the [`ReplacementPolicy`] trait; concrete
//! policies are swappable at construction time via [`PolicyKind`]:
//! - [`ClockPolicy`] - rotating hand with a second chance
//! - [`FifoPolicy`] - evict in load order
//! - [`LruPolicy`] - evict the least recently pinned

mod clock;
mod fifo;
mod lru;

pub use clock::ClockPolicy;
pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::buffer::frame::FrameDescriptor;
use crate::common::FrameId;

/// Eviction strategy for the buffer pool.
///
/// The pool owns the descriptor arena; a policy sees it only as the
/// mutable slice passed to [`pick_victim`] and otherwise tracks frames by
/// index. Notifications are synchronous, fired exactly once per pool
/// event, and must only update policy bookkeeping and the frame's policy
/// state - never pin counts, and never evict on their own.
///
/// Contract shared by every implementation:
/// - a frame with `pin_count > 0` is never returned by `pick_victim`;
/// - never-used frames are granted, in index order, before any resident
///   page is displaced;
/// - the granted frame is marked [`FrameState::Pinned`] before it is
///   returned, so a policy cannot hand the same frame out twice while the
///   pool is repopulating it.
///
/// [`pick_victim`]: ReplacementPolicy::pick_victim
/// [`FrameState::Pinned`]: crate::buffer::FrameState
pub trait ReplacementPolicy {
    /// A freshly allocated page was pinned into `frame_id`.
    fn notify_new_page(&mut self, frame_id: FrameId);

    /// The page in `frame_id` was freed; the frame is empty again.
    fn notify_free_page(&mut self, frame_id: FrameId);

    /// The page in `frame_id` was pinned (hit or newly loaded).
    fn notify_pin(&mut self, frame_id: FrameId);

    /// The page in `frame_id` was unpinned (pin count may still be > 0).
    fn notify_unpin(&mut self, frame_id: FrameId);

    /// Choose a frame to receive the next page, or `None` if every frame
    /// is pinned.
    fn pick_victim(&mut self, frames: &mut [FrameDescriptor]) -> Option<FrameId>;
}

/// Selector for the built-in replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Clock sweep with a second chance for referenced frames.
    Clock,
    /// First-in-first-out over load order.
    Fifo,
    /// Least-recently-pinned first.
    Lru,
}

impl PolicyKind {
    /// Instantiate the policy for a pool of `pool_size` frames.
    pub fn build(self, pool_size: usize) -> Box<dyn ReplacementPolicy> {
        match self {
            PolicyKind::Clock => Box::new(ClockPolicy::new(pool_size)),
            PolicyKind::Fifo => Box::new(FifoPolicy::new(pool_size)),
            PolicyKind::Lru => Box::new(LruPolicy::new(pool_size)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// A descriptor arena with `n` empty frames.
    pub fn arena(n: usize) -> Vec<FrameDescriptor> {
        (0..n).map(|i| FrameDescriptor::new(FrameId::new(i))).collect()
    }

    /// Simulate the pool loading `page` into `frame` at pin count 1.
    pub fn load(frames: &mut [FrameDescriptor], frame: FrameId, page: u32) {
        frames[frame.0].assign(crate::common::PageId::new(page));
    }

    /// Simulate the pool unpinning the page in `frame` down to zero pins.
    pub fn unpin(frames: &mut [FrameDescriptor], frame: FrameId) {
        frames[frame.0].decr_pin();
        if !frames[frame.0].is_pinned() {
            frames[frame.0].set_state(crate::buffer::FrameState::Referenced);
        }
    }
}
