//! Integration tests for the buffer pool.
//!
//! These tests verify cross-component behavior that unit tests don't cover:
//! write-back through the disk manager, persistence across pool instances,
//! and the stats export under realistic workloads.

use pagepool::storage::DiskManager;
use pagepool::{BufferPool, Error, Page, PinMode, PolicyKind, UnpinMode};
use tempfile::tempdir;

fn create_pool(pool_size: usize, policy: PolicyKind) -> (BufferPool, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let dm = DiskManager::create(&path).unwrap();
    (BufferPool::new(pool_size, dm, policy), dir)
}

/// Seed a page, unpin dirty, flush, then re-pin from disk: the bytes must
/// round-trip exactly.
#[test]
fn test_init_in_place_round_trip() {
    let (mut pool, _dir) = create_pool(4, PolicyKind::Clock);

    let mut seed = Page::new();
    seed.as_mut_slice()[..5].copy_from_slice(b"hello");
    seed.as_mut_slice()[4095] = 0x7F;

    let pid = pool.allocate_pages(&mut seed, 1).unwrap();
    pool.unpin_page(pid, UnpinMode::Dirty).unwrap();
    pool.flush_page(pid).unwrap();

    // Evict it so the next pin is a genuine disk read.
    for _ in 0..4 {
        let mut buf = Page::new();
        let filler = pool.allocate_pages(&mut buf, 1).unwrap();
        pool.unpin_page(filler, UnpinMode::Clean).unwrap();
    }

    let mut out = Page::new();
    pool.pin_page(pid, &mut out, PinMode::ReadFromDisk).unwrap();
    assert_eq!(&out.as_slice()[..5], b"hello");
    assert_eq!(out.as_slice()[4095], 0x7F);
}

/// Data survives across pool instances once flushed.
#[test]
fn test_flush_and_reload_across_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let data = b"persistent!";

    let pid;
    {
        let dm = DiskManager::create(&path).unwrap();
        let mut pool = BufferPool::new(4, dm, PolicyKind::Lru);

        let mut seed = Page::new();
        seed.as_mut_slice()[..data.len()].copy_from_slice(data);
        pid = pool.allocate_pages(&mut seed, 1).unwrap();
        pool.unpin_page(pid, UnpinMode::Dirty).unwrap();
        pool.flush_all_pages().unwrap();
    }

    {
        let dm = DiskManager::open(&path).unwrap();
        let mut pool = BufferPool::new(4, dm, PolicyKind::Lru);

        let mut out = Page::new();
        pool.pin_page(pid, &mut out, PinMode::ReadFromDisk).unwrap();
        assert_eq!(&out.as_slice()[..data.len()], data);
    }
}

/// Pages evicted under memory pressure come back intact.
#[test]
fn test_data_persistence_across_evictions() {
    let (mut pool, _dir) = create_pool(2, PolicyKind::Fifo);

    let mut seed = Page::new();
    let first = pool.allocate_pages(&mut seed, 5).unwrap();
    pool.unpin_page(first, UnpinMode::Clean).unwrap();

    // Touch each of the 5 pages once; the pool has 2 frames, so this
    // churns through several evictions.
    for i in 0..5 {
        let pid = first.advance(i);
        let mut buf = Page::new();
        pool.pin_page(pid, &mut buf, PinMode::ReadFromDisk).unwrap();
        pool.unpin_page(pid, UnpinMode::Clean).unwrap();
    }

    for i in 0..5 {
        let pid = first.advance(i);
        let mut out = Page::new();
        pool.pin_page(pid, &mut out, PinMode::ReadFromDisk).unwrap();
        assert_eq!(out.as_slice()[0], 0); // runs start zero-filled
        pool.unpin_page(pid, UnpinMode::Clean).unwrap();
    }

    assert_eq!(pool.num_unpinned(), pool.num_buffers());
}

/// The full allocate / dirty / flush cycle a heap file layer would
/// drive: a run of 4 pages, each pinned and unpinned dirty once, then a
/// global flush leaves nothing dirty and nothing pinned.
#[test]
fn test_end_to_end_run_workflow() {
    let (mut pool, _dir) = create_pool(4, PolicyKind::Clock);

    let mut seed = Page::new();
    seed.as_mut_slice()[0] = 0xA0;
    let first = pool.allocate_pages(&mut seed, 4).unwrap();
    pool.unpin_page(first, UnpinMode::Dirty).unwrap();

    for i in 1..4 {
        let pid = first.advance(i);
        let mut buf = Page::new();
        pool.pin_page(pid, &mut buf, PinMode::ReadFromDisk).unwrap();
        pool.unpin_page(pid, UnpinMode::Dirty).unwrap();
    }

    pool.flush_all_pages().unwrap();

    assert_eq!(pool.num_unpinned(), pool.num_buffers());
    for i in 0..4 {
        let pid = first.advance(i);
        let mut out = Page::new();
        pool.pin_page(pid, &mut out, PinMode::ReadFromDisk).unwrap();
        pool.unpin_page(pid, UnpinMode::Clean).unwrap();
    }
    // Re-reading flushed pages dirties nothing.
    assert_eq!(pool.num_unpinned(), pool.num_buffers());
}

/// Pinning N+1 distinct pages without unpinning fails on the last one,
/// and the pool recovers once a pin is released.
#[test]
fn test_pool_exhaustion_and_recovery() {
    let (mut pool, _dir) = create_pool(3, PolicyKind::Lru);

    let mut seed = Page::new();
    let first = pool.allocate_pages(&mut seed, 4).unwrap();
    pool.unpin_page(first, UnpinMode::Clean).unwrap();

    for i in 0..3 {
        let mut buf = Page::new();
        pool.pin_page(first.advance(i), &mut buf, PinMode::ReadFromDisk)
            .unwrap();
    }

    let mut buf = Page::new();
    assert!(matches!(
        pool.pin_page(first.advance(3), &mut buf, PinMode::ReadFromDisk),
        Err(Error::PoolExhausted)
    ));

    pool.unpin_page(first.advance(1), UnpinMode::Clean).unwrap();
    pool.pin_page(first.advance(3), &mut buf, PinMode::ReadFromDisk)
        .unwrap();
    assert_eq!(pool.num_unpinned(), 0);
}

/// Double pin with in-place initialization is refused and the pin count
/// is untouched, across every policy.
#[test]
fn test_double_pin_rejected_for_all_policies() {
    for kind in [PolicyKind::Clock, PolicyKind::Fifo, PolicyKind::Lru] {
        let (mut pool, _dir) = create_pool(2, kind);

        let mut seed = Page::new();
        let pid = pool.allocate_pages(&mut seed, 1).unwrap();

        let mut other = Page::new();
        assert!(matches!(
            pool.pin_page(pid, &mut other, PinMode::InitInPlace),
            Err(Error::DoublePin(_))
        ));

        // Exactly one unpin succeeds: the count was not touched.
        pool.unpin_page(pid, UnpinMode::Clean).unwrap();
        assert!(matches!(
            pool.unpin_page(pid, UnpinMode::Clean),
            Err(Error::PageNotPinned(_))
        ));
    }
}

/// The stats export reflects a mixed workload and never interferes with
/// pool behavior.
#[test]
fn test_stats_accuracy() {
    let (mut pool, _dir) = create_pool(2, PolicyKind::Fifo);

    let mut seed = Page::new();
    let first = pool.allocate_pages(&mut seed, 3).unwrap();
    pool.unpin_page(first, UnpinMode::Clean).unwrap();

    // 5 hits on the resident first page.
    for _ in 0..5 {
        let mut out = Page::new();
        pool.pin_page(first, &mut out, PinMode::ReadFromDisk).unwrap();
        pool.unpin_page(first, UnpinMode::Clean).unwrap();
    }

    // Two more loads force an eviction in the 2-frame pool.
    for i in 1..3 {
        let mut out = Page::new();
        pool.pin_page(first.advance(i), &mut out, PinMode::ReadFromDisk)
            .unwrap();
        pool.unpin_page(first.advance(i), UnpinMode::Clean).unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.total_hits(), 5);
    assert_eq!(stats.total_loads(), 3);
    assert_eq!(stats.page_counters(first).unwrap().hits, 5);
    assert_eq!(stats.hit_ratio(), Some(5.0 / 3.0));

    let evicted: u64 = (0..3)
        .filter_map(|i| pool.stats().page_counters(first.advance(i)))
        .map(|c| c.evictions)
        .sum();
    assert_eq!(evicted, 1);
}
