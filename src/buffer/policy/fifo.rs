//! FIFO (first-in-first-out) replacement policy.

use std::collections::VecDeque;

use crate::buffer::frame::{FrameDescriptor, FrameState};
use crate::buffer::policy::ReplacementPolicy;
use crate::common::FrameId;

/// Evict frames in page-load order.
///
/// The queue holds frame indices from oldest load (front) to newest
/// (back). A granted frame re-enters at the back since it is about to
/// hold the newest load; a pinned frame reached at the front is rotated
/// to the back rather than evicted. Re-pinning a resident page does not
/// reorder the queue - load order, not access order, decides.
///
/// Never-used frames are granted in index order before the queue is
/// consulted.
pub struct FifoPolicy {
    /// Frame indices in load order (front = oldest).
    queue: VecDeque<FrameId>,
    /// Frames handed out so far while the pool was filling.
    frames_used: usize,
}

impl FifoPolicy {
    /// Create a FIFO policy for a pool of `pool_size` frames.
    pub fn new(pool_size: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(pool_size),
            frames_used: 0,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn notify_new_page(&mut self, _frame_id: FrameId) {}

    fn notify_free_page(&mut self, frame_id: FrameId) {
        // Empty frames go to the front so they are reused before any
        // resident page is displaced.
        self.queue.retain(|&f| f != frame_id);
        self.queue.push_front(frame_id);
    }

    fn notify_pin(&mut self, _frame_id: FrameId) {}

    fn notify_unpin(&mut self, _frame_id: FrameId) {}

    fn pick_victim(&mut self, frames: &mut [FrameDescriptor]) -> Option<FrameId> {
        if self.frames_used < frames.len() {
            let frame_id = FrameId::new(self.frames_used);
            self.frames_used += 1;
            frames[frame_id.0].set_state(FrameState::Pinned);
            self.queue.push_back(frame_id);
            return Some(frame_id);
        }

        for _ in 0..self.queue.len() {
            let frame_id = self.queue.pop_front()?;
            self.queue.push_back(frame_id);
            if frames[frame_id.0].is_evictable() {
                frames[frame_id.0].set_state(FrameState::Pinned);
                return Some(frame_id);
            }
        }
        None
    }
}
