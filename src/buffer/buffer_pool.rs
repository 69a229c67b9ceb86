//! BufferPool - the core page caching layer.
//!
//! The [`BufferPool`] mediates every access to persistent pages:
//! - Pin-based reference counting with explicit pin/unpin calls
//! - Automatic dirty write-back when a victim is displaced
//! - Allocation and deallocation of contiguous page runs
//! - Pluggable eviction policies, chosen at construction

use std::collections::HashMap;

use crate::buffer::frame::{FrameDescriptor, FrameState};
use crate::buffer::policy::{PolicyKind, ReplacementPolicy};
use crate::buffer::stats::UsageStats;
use crate::common::{Error, FrameId, PageId, Result};
use crate::storage::{DiskManager, Page};

/// How a miss is serviced by [`BufferPool::pin_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Copy the caller's buffer into the frame; no disk read. Only valid
    /// for a page that is not yet resident.
    InitInPlace,
    /// Read the page's bytes from the page store.
    ReadFromDisk,
}

/// How [`BufferPool::unpin_page`] treats the dirty flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpinMode {
    /// The caller modified the page; it must be written back eventually.
    Dirty,
    /// The caller only read the page. Does not clear an earlier Dirty.
    Clean,
}

/// Manages a fixed arena of frames caching disk pages.
///
/// The pool owns three index-aligned structures - the page arena
/// (`frames`), the descriptor table (`frame_table`) and, through the
/// descriptor table, all policy-visible state - plus the page-to-frame
/// index. The policy never holds references into the arena; it works with
/// frame indices and sees descriptors only inside `pick_victim`.
///
/// One pool instance is accessed by one logical caller at a time; all
/// methods take `&mut self` and complete synchronously.
///
/// # Usage
/// ```no_run
/// use pagepool::{BufferPool, Page, PinMode, PolicyKind, UnpinMode};
/// use pagepool::storage::DiskManager;
///
/// let dm = DiskManager::create("pool.db").unwrap();
/// let mut pool = BufferPool::new(8, dm, PolicyKind::Lru);
///
/// let mut buf = Page::new();
/// buf.as_mut_slice()[0] = 0x42;
/// let pid = pool.allocate_pages(&mut buf, 1).unwrap();
/// pool.unpin_page(pid, UnpinMode::Dirty).unwrap();
/// ```
pub struct BufferPool {
    /// Page arena; `frames[i]` holds the bytes for frame `i`.
    frames: Vec<Page>,

    /// Descriptor table, index-aligned with `frames`.
    frame_table: Vec<FrameDescriptor>,

    /// Maps resident page ids to frame ids. Entries exist exactly for
    /// resident pages.
    page_table: HashMap<PageId, FrameId>,

    /// Eviction policy; owned by and private to this pool.
    policy: Box<dyn ReplacementPolicy>,

    /// Handles all disk I/O and on-disk allocation state.
    disk: DiskManager,

    /// Hit/load/eviction accounting. Observational only.
    stats: UsageStats,
}

impl BufferPool {
    /// Create a buffer pool with one of the built-in policies.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn new(pool_size: usize, disk: DiskManager, policy: PolicyKind) -> Self {
        Self::with_policy(pool_size, disk, policy.build(pool_size))
    }

    /// Create a buffer pool around a caller-supplied policy.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn with_policy(
        pool_size: usize,
        disk: DiskManager,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");

        let frames = (0..pool_size).map(|_| Page::new()).collect();
        let frame_table = (0..pool_size)
            .map(|i| FrameDescriptor::new(FrameId::new(i)))
            .collect();

        Self {
            frames,
            frame_table,
            page_table: HashMap::new(),
            policy,
            disk,
            stats: UsageStats::new(),
        }
    }

    // ========================================================================
    // Public API: allocate and free pages
    // ========================================================================

    /// Allocate `run_length` contiguous pages and pin the first one.
    ///
    /// The first page is pinned with [`PinMode::InitInPlace`]: the
    /// caller's buffer seeds the frame and no disk read happens. The
    /// remaining pages of the run exist on disk, zero-filled, until
    /// pinned. Returns the id of the first page.
    ///
    /// If the pin fails (for instance [`Error::PoolExhausted`]), the
    /// whole reserved run is deallocated before the error is surfaced, so
    /// a failed allocation leaks no disk space.
    pub fn allocate_pages(&mut self, first_page: &mut Page, run_length: u32) -> Result<PageId> {
        let first = self.disk.allocate_run(run_length)?;

        if let Err(err) = self.pin_page(first, first_page, PinMode::InitInPlace) {
            self.disk.deallocate_run(first, run_length)?;
            return Err(err);
        }

        let frame_id = self.page_table[&first];
        self.policy.notify_new_page(frame_id);
        Ok(first)
    }

    /// Deallocate a single page, dropping it from the pool if resident.
    ///
    /// The deallocation is always forwarded to the disk manager, resident
    /// or not.
    ///
    /// # Errors
    /// [`Error::PagePinned`] if the page is resident with active pins;
    /// the page then stays resident and allocated.
    pub fn free_page(&mut self, page_id: PageId) -> Result<()> {
        if let Some(&frame_id) = self.page_table.get(&page_id) {
            if self.frame_table[frame_id.0].is_pinned() {
                return Err(Error::PagePinned(page_id.0));
            }

            self.page_table.remove(&page_id);
            self.frame_table[frame_id.0].reset();
            self.policy.notify_free_page(frame_id);
        }

        self.disk.deallocate_page(page_id)
    }

    // ========================================================================
    // Public API: pin and unpin
    // ========================================================================

    /// Pin a page into the pool and copy its bytes into `page`.
    ///
    /// On a hit the pin count is incremented and the resident copy is
    /// returned. On a miss the policy picks a victim frame, a dirty
    /// victim is written back, and the frame is repopulated either from
    /// `page` ([`PinMode::InitInPlace`]) or from disk
    /// ([`PinMode::ReadFromDisk`]).
    ///
    /// After a successful return, `page` holds exactly the current bytes
    /// of `page_id` and the page's pin count has grown by one.
    ///
    /// # Errors
    /// - [`Error::DoublePin`] for `InitInPlace` on a resident page (pin
    ///   count untouched)
    /// - [`Error::PoolExhausted`] if every frame is pinned
    /// - [`Error::PageNotFound`] for a `ReadFromDisk` miss on an
    ///   unallocated page
    pub fn pin_page(&mut self, page_id: PageId, page: &mut Page, mode: PinMode) -> Result<()> {
        if let Some(&frame_id) = self.page_table.get(&page_id) {
            if mode == PinMode::InitInPlace {
                return Err(Error::DoublePin(page_id.0));
            }

            self.frame_table[frame_id.0].incr_pin();
            page.copy_from(&self.frames[frame_id.0]);
            self.stats.record_hit(page_id);
            self.policy.notify_pin(frame_id);
            return Ok(());
        }

        let frame_id = self
            .policy
            .pick_victim(&mut self.frame_table)
            .ok_or(Error::PoolExhausted)?;
        debug_assert!(!self.frame_table[frame_id.0].is_pinned());

        self.evict_resident(frame_id)?;

        match mode {
            PinMode::InitInPlace => self.frames[frame_id.0].copy_from(page),
            PinMode::ReadFromDisk => {
                if let Err(err) = self.disk.read_page_into(page_id, &mut self.frames[frame_id.0]) {
                    // The frame was already emptied; hand it back as free
                    // rather than leaving it claimed by a failed load.
                    self.frame_table[frame_id.0].reset();
                    self.policy.notify_free_page(frame_id);
                    return Err(err);
                }
                page.copy_from(&self.frames[frame_id.0]);
            }
        }

        self.frame_table[frame_id.0].assign(page_id);
        self.page_table.insert(page_id, frame_id);
        self.stats.record_load(page_id);
        self.policy.notify_pin(frame_id);
        Ok(())
    }

    /// Unpin a page, decrementing its pin count.
    ///
    /// [`UnpinMode::Dirty`] ORs the dirty flag in: once dirtied, a page
    /// stays dirty until flushed, regardless of later clean unpins. When
    /// the pin count reaches zero the frame becomes `Referenced` and thus
    /// eligible for eviction.
    ///
    /// # Errors
    /// [`Error::PageNotResident`] / [`Error::PageNotPinned`] on caller
    /// discipline violations; state is untouched in both cases.
    pub fn unpin_page(&mut self, page_id: PageId, mode: UnpinMode) -> Result<()> {
        let frame_id = *self
            .page_table
            .get(&page_id)
            .ok_or(Error::PageNotResident(page_id.0))?;

        let desc = &mut self.frame_table[frame_id.0];
        if !desc.is_pinned() {
            return Err(Error::PageNotPinned(page_id.0));
        }

        desc.decr_pin();
        if mode == UnpinMode::Dirty {
            desc.mark_dirty();
        }
        if !desc.is_pinned() {
            desc.set_state(FrameState::Referenced);
        }
        self.policy.notify_unpin(frame_id);
        Ok(())
    }

    // ========================================================================
    // Public API: flush
    // ========================================================================

    /// Write the page back to disk if it is resident and dirty.
    ///
    /// Flushing a clean or non-resident page is a no-op; calling this
    /// twice in a row performs no second write.
    pub fn flush_page(&mut self, page_id: PageId) -> Result<()> {
        self.flush_matching(Some(page_id))
    }

    /// Write every dirty resident page back to disk.
    pub fn flush_all_pages(&mut self) -> Result<()> {
        self.flush_matching(None)
    }

    // ========================================================================
    // Public API: accessors
    // ========================================================================

    /// Total number of frames in the pool.
    pub fn num_buffers(&self) -> usize {
        self.frame_table.len()
    }

    /// Number of frames with a zero pin count.
    pub fn num_unpinned(&self) -> usize {
        self.frame_table.iter().filter(|d| !d.is_pinned()).count()
    }

    /// Number of resident pages.
    pub fn resident_count(&self) -> usize {
        self.page_table.len()
    }

    /// Usage accounting (hits, loads, evictions, hit ratio).
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    /// Zero all usage counters.
    ///
    /// An explicit operation: allocation cycles never reset counters
    /// behind the caller's back.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// The descriptor for `frame_id`, for inspection.
    pub fn frame_descriptor(&self, frame_id: FrameId) -> &FrameDescriptor {
        &self.frame_table[frame_id.0]
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Displace whatever valid page occupies `frame_id`.
    ///
    /// A dirty victim is written back before it is unmapped, so a failed
    /// write-back leaves the mapping intact and surfaces the I/O error.
    /// Write-back is decided by the dirty flag alone and never skipped.
    fn evict_resident(&mut self, frame_id: FrameId) -> Result<()> {
        let old_page = self.frame_table[frame_id.0].page_id();
        if !old_page.is_valid() {
            return Ok(());
        }

        if self.frame_table[frame_id.0].is_dirty() {
            self.disk.write_page(old_page, &self.frames[frame_id.0])?;
            self.frame_table[frame_id.0].clear_dirty();
        }

        self.page_table.remove(&old_page);
        self.stats.record_eviction(old_page);
        Ok(())
    }

    /// Flush frames whose resident page matches `filter` (all frames when
    /// `None`) and are dirty.
    fn flush_matching(&mut self, filter: Option<PageId>) -> Result<()> {
        for i in 0..self.frame_table.len() {
            let desc = &self.frame_table[i];
            let page_id = desc.page_id();
            if !page_id.is_valid() || !desc.is_dirty() {
                continue;
            }
            if filter.map_or(true, |want| want == page_id) {
                self.disk.write_page(page_id, &self.frames[i])?;
                self.frame_table[i].clear_dirty();
            }
        }
        Ok(())
    }
}
