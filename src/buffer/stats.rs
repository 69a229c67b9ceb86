//! Usage accounting for the buffer pool.
//!
//! Pure observation: these counters are updated as a side effect of
//! pin/load/evict events and are never consulted by eviction or pinning
//! logic. A reporting layer reads them through [`BufferPool::stats`].
//!
//! [`BufferPool::stats`]: crate::buffer::BufferPool::stats

use std::collections::HashMap;
use std::fmt;

use crate::common::PageId;

/// Per-page counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCounters {
    /// Times this page was brought into a frame (disk read or in-place init).
    pub loads: u64,
    /// Times a pin was satisfied by the resident copy.
    pub hits: u64,
    /// Times this page was displaced to make room for another.
    pub evictions: u64,
}

/// Hit/load/eviction accounting, keyed by page id.
///
/// The table grows with the set of pages ever touched, so page ids need
/// not fit any preconfigured bound. Counters accumulate until
/// [`UsageStats::reset`] is called (exposed as an explicit pool
/// operation, never a side effect of allocation).
#[derive(Debug, Default)]
pub struct UsageStats {
    per_page: HashMap<PageId, PageCounters>,
    total_hits: u64,
    total_loads: u64,
}

impl UsageStats {
    /// Create a stats table with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pins satisfied without a load.
    #[inline]
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Total page loads (disk reads plus in-place initializations).
    #[inline]
    pub fn total_loads(&self) -> u64 {
        self.total_loads
    }

    /// Aggregate hit ratio: `total_hits / total_loads`.
    ///
    /// `None` until at least one load has happened.
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.total_loads == 0 {
            None
        } else {
            Some(self.total_hits as f64 / self.total_loads as f64)
        }
    }

    /// Counters for one page, if it was ever touched.
    pub fn page_counters(&self, page_id: PageId) -> Option<&PageCounters> {
        self.per_page.get(&page_id)
    }

    /// Iterate over all (page, counters) rows.
    pub fn iter(&self) -> impl Iterator<Item = (&PageId, &PageCounters)> {
        self.per_page.iter()
    }

    /// Zero every counter and drop all per-page rows.
    pub fn reset(&mut self) {
        self.per_page.clear();
        self.total_hits = 0;
        self.total_loads = 0;
    }

    pub(crate) fn record_hit(&mut self, page_id: PageId) {
        self.per_page.entry(page_id).or_default().hits += 1;
        self.total_hits += 1;
    }

    pub(crate) fn record_load(&mut self, page_id: PageId) {
        self.per_page.entry(page_id).or_default().loads += 1;
        self.total_loads += 1;
    }

    pub(crate) fn record_eviction(&mut self, page_id: PageId) {
        self.per_page.entry(page_id).or_default().evictions += 1;
    }
}

impl fmt::Display for UsageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hit_ratio() {
            Some(ratio) => write!(
                f,
                "UsageStats {{ hits: {}, loads: {}, hit_ratio: {:.2}% }}",
                self.total_hits,
                self.total_loads,
                ratio * 100.0
            ),
            None => write!(
                f,
                "UsageStats {{ hits: {}, loads: 0, hit_ratio: n/a }}",
                self.total_hits
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_empty() {
        let stats = UsageStats::new();
        assert_eq!(stats.total_hits(), 0);
        assert_eq!(stats.total_loads(), 0);
        assert_eq!(stats.hit_ratio(), None);
        assert!(stats.page_counters(PageId::new(0)).is_none());
    }

    #[test]
    fn test_record_and_ratio() {
        let mut stats = UsageStats::new();
        let pid = PageId::new(5);

        stats.record_load(pid);
        stats.record_hit(pid);
        stats.record_hit(pid);
        stats.record_eviction(pid);

        let counters = stats.page_counters(pid).unwrap();
        assert_eq!(counters.loads, 1);
        assert_eq!(counters.hits, 2);
        assert_eq!(counters.evictions, 1);

        assert_eq!(stats.hit_ratio(), Some(2.0));
    }

    #[test]
    fn test_large_page_ids_tracked() {
        // No fixed-size table: ids far past any assumed bound still count.
        let mut stats = UsageStats::new();
        let pid = PageId::new(1_000_000);

        stats.record_load(pid);
        assert_eq!(stats.page_counters(pid).unwrap().loads, 1);
    }

    #[test]
    fn test_reset() {
        let mut stats = UsageStats::new();
        stats.record_load(PageId::new(1));
        stats.record_hit(PageId::new(1));

        stats.reset();

        assert_eq!(stats.total_hits(), 0);
        assert_eq!(stats.total_loads(), 0);
        assert!(stats.page_counters(PageId::new(1)).is_none());
    }

    #[test]
    fn test_display() {
        let mut stats = UsageStats::new();
        assert!(format!("{}", stats).contains("n/a"));

        stats.record_load(PageId::new(1));
        stats.record_hit(PageId::new(1));
        let shown = format!("{}", stats);
        assert!(shown.contains("hits: 1"));
        assert!(shown.contains("100.00%"));
    }
}
