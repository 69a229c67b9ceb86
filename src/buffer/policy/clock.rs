//! Clock-sweep replacement policy.

use crate::buffer::frame::{FrameDescriptor, FrameState};
use crate::buffer::policy::ReplacementPolicy;
use crate::common::FrameId;

/// Clock sweep with a second chance.
///
/// A rotating hand walks the frame arena. The variant implemented here is
/// the classic second-chance clock: a `Referenced` frame is demoted to
/// `Available` the first time the hand passes it and only evicted on a
/// later pass; an `Available` frame is evicted on sight; `Pinned` frames
/// are skipped. The hand therefore completes at most two sweeps before it
/// finds a victim, and fails only when every frame is pinned.
///
/// Never-used frames are consumed in index order before the hand moves at
/// all, so no resident page is displaced while the pool is filling.
pub struct ClockPolicy {
    /// Next frame the hand will examine.
    hand: usize,
    /// Frames handed out so far while the pool was filling.
    frames_used: usize,
}

impl ClockPolicy {
    /// Create a clock policy for a pool of `pool_size` frames.
    pub fn new(pool_size: usize) -> Self {
        let _ = pool_size;
        Self {
            hand: 0,
            frames_used: 0,
        }
    }

    fn advance(&mut self, len: usize) {
        self.hand = (self.hand + 1) % len;
    }
}

impl ReplacementPolicy for ClockPolicy {
    fn notify_new_page(&mut self, _frame_id: FrameId) {}

    fn notify_free_page(&mut self, _frame_id: FrameId) {
        // The freed frame is Available; the hand will find it.
    }

    fn notify_pin(&mut self, _frame_id: FrameId) {}

    fn notify_unpin(&mut self, _frame_id: FrameId) {}

    fn pick_victim(&mut self, frames: &mut [FrameDescriptor]) -> Option<FrameId> {
        if self.frames_used < frames.len() {
            let frame_id = FrameId::new(self.frames_used);
            self.frames_used += 1;
            frames[frame_id.0].set_state(FrameState::Pinned);
            return Some(frame_id);
        }

        if frames.iter().all(|f| !f.is_evictable()) {
            return None;
        }

        // At least one frame is evictable, so two sweeps suffice: the
        // first demotes Referenced frames, the second must hit Available.
        for _ in 0..2 * frames.len() {
            let current = self.hand;
            self.advance(frames.len());

            let frame = &mut frames[current];
            if !frame.is_evictable() {
                continue;
            }
            match frame.state() {
                FrameState::Referenced => frame.set_state(FrameState::Available),
                FrameState::Available => {
                    frame.set_state(FrameState::Pinned);
                    return Some(FrameId::new(current));
                }
                FrameState::Pinned => unreachable!("evictable frame cannot be Pinned"),
            }
        }
        None
    }
}
