//! FrameDescriptor - per-slot metadata for the buffer pool.
//!
//! One descriptor exists per frame, created at pool construction and
//! index-addressed alongside the page arena. A descriptor cycles through
//! empty -> resident -> empty for the life of the pool.

use crate::common::{FrameId, PageId};

/// Replacement-policy state of a frame.
///
/// The pool drives the transitions: `Pinned` whenever a page is pinned
/// into the frame, `Referenced` when the pin count returns to zero, and
/// `Available` when the frame is emptied. Policies read this state when
/// picking victims; the clock policy additionally demotes `Referenced`
/// frames to `Available` as its hand sweeps past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Empty, or passed over by the clock hand since last use.
    Available,
    /// Was pinned at least once and currently has no holders.
    Referenced,
    /// Has active holders (or was just granted as a victim).
    Pinned,
}

/// Metadata for one frame in the buffer pool.
///
/// The descriptor never owns page bytes; those live in the pool's page
/// arena at the same index.
#[derive(Debug)]
pub struct FrameDescriptor {
    /// Position in the frame arena; fixed at construction.
    frame_id: FrameId,
    /// Page occupying the frame, or `PageId::INVALID` when empty.
    page_id: PageId,
    /// Number of active holders. A frame with holders is never evicted.
    pin_count: u32,
    /// Whether the resident page was modified since its last write-back.
    dirty: bool,
    /// Replacement-policy state.
    state: FrameState,
    /// How many distinct page loads this frame has serviced. Observational
    /// only; survives `reset`.
    load_count: u64,
}

impl FrameDescriptor {
    /// Create a descriptor for an empty frame.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            page_id: PageId::INVALID,
            pin_count: 0,
            dirty: false,
            state: FrameState::Available,
            load_count: 0,
        }
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    /// Whether the frame holds a page.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.page_id.is_valid()
    }

    /// Whether a policy may hand this frame out as a victim.
    ///
    /// Both conditions matter: the pin count covers active holders, and
    /// the `Pinned` state additionally covers a frame a policy has already
    /// granted but the pool has not yet repopulated.
    #[inline]
    pub fn is_evictable(&self) -> bool {
        self.pin_count == 0 && self.state != FrameState::Pinned
    }

    pub(crate) fn set_state(&mut self, state: FrameState) {
        self.state = state;
    }

    /// Increment the pin count, returning the new value.
    pub(crate) fn incr_pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.state = FrameState::Pinned;
        self.pin_count
    }

    /// Decrement the pin count, returning the new value.
    ///
    /// The caller must have verified `pin_count > 0`; state transitions
    /// (to `Referenced` at zero) are the pool's job.
    pub(crate) fn decr_pin(&mut self) -> u32 {
        debug_assert!(self.pin_count > 0, "pin count underflow");
        self.pin_count -= 1;
        self.pin_count
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Install a freshly loaded page: pin count 1, clean, `Pinned`.
    ///
    /// Counts as one load for telemetry.
    pub(crate) fn assign(&mut self, page_id: PageId) {
        debug_assert!(page_id.is_valid());
        self.page_id = page_id;
        self.pin_count = 1;
        self.dirty = false;
        self.state = FrameState::Pinned;
        self.load_count += 1;
    }

    /// Return the frame to the empty state. `load_count` is preserved.
    pub(crate) fn reset(&mut self) {
        self.page_id = PageId::INVALID;
        self.pin_count = 0;
        self.dirty = false;
        self.state = FrameState::Available;
    }
}
