//! LRU (least-recently-used) replacement policy.

use crate::buffer::frame::{FrameDescriptor, FrameState};
use crate::buffer::policy::ReplacementPolicy;
use crate::common::FrameId;

/// Evict the least recently pinned frame.
///
/// `order` runs from the LRU end (index 0) to the MRU end. Every pin
/// moves the frame to the MRU end; victim selection scans from the LRU
/// end for the first frame without holders and touches it, so the frame
/// that is about to receive a page already counts as most recently used.
///
/// Never-used frames are granted in index order before the pool is full.
pub struct LruPolicy {
    /// Frame indices, least recently pinned first.
    order: Vec<FrameId>,
    /// Frames handed out so far while the pool was filling.
    frames_used: usize,
}

impl LruPolicy {
    /// Create an LRU policy for a pool of `pool_size` frames.
    pub fn new(pool_size: usize) -> Self {
        Self {
            order: Vec::with_capacity(pool_size),
            frames_used: 0,
        }
    }

    /// Move `frame_id` to the MRU end.
    fn touch(&mut self, frame_id: FrameId) {
        if let Some(pos) = self.order.iter().position(|&f| f == frame_id) {
            self.order.remove(pos);
        }
        self.order.push(frame_id);
    }
}

impl ReplacementPolicy for LruPolicy {
    fn notify_new_page(&mut self, _frame_id: FrameId) {}

    fn notify_free_page(&mut self, frame_id: FrameId) {
        // An empty frame is the best victim: park it at the LRU end.
        if let Some(pos) = self.order.iter().position(|&f| f == frame_id) {
            self.order.remove(pos);
        }
        self.order.insert(0, frame_id);
    }

    fn notify_pin(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn notify_unpin(&mut self, _frame_id: FrameId) {}

    fn pick_victim(&mut self, frames: &mut [FrameDescriptor]) -> Option<FrameId> {
        if self.frames_used < frames.len() {
            let frame_id = FrameId::new(self.frames_used);
            self.frames_used += 1;
            frames[frame_id.0].set_state(FrameState::Pinned);
            self.touch(frame_id);
            return Some(frame_id);
        }

        let frame_id = *self
            .order
            .iter()
            .find(|&&f| frames[f.0].is_evictable())?;
        frames[frame_id.0].set_state(FrameState::Pinned);
        self.touch(frame_id);
        Some(frame_id)
    }
}
