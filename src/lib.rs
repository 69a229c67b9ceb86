//! pagepool - a disk-backed buffer pool with swappable page-replacement policies.
//!
//! The buffer pool mediates every access to persistent pages: it decides which
//! pages reside in memory, when dirty pages are written back, and which frame
//! is reused when the pool is full. Eviction decisions are delegated to a
//! [`ReplacementPolicy`] chosen at construction time.
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       BufferPool                         │
//! │  ┌──────────────┐  ┌──────────────────────────────────┐  │
//! │  │  page_table  │  │  frames: Vec<Page>               │  │
//! │  │ PageId → Fid │─▶│  frame_table: Vec<FrameDescriptor│  │
//! │  └──────────────┘  └──────────────────────────────────┘  │
//! │  ┌──────────────────────────────┐  ┌──────────────┐      │
//! │  │ policy: Box<dyn Replacement  │  │ DiskManager  │      │
//! │  │   Policy>  CLOCK | FIFO | LRU│  │ (page store) │      │
//! │  └──────────────────────────────┘  └──────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - The buffer pool, frame descriptors, policies, usage stats
//! - [`storage`] - Page-granular disk I/O and the page container
//!
//! # Quick Start
//! ```no_run
//! use pagepool::{BufferPool, Page, PinMode, PolicyKind, UnpinMode};
//! use pagepool::storage::DiskManager;
//!
//! let dm = DiskManager::create("pool.db").unwrap();
//! let mut pool = BufferPool::new(16, dm, PolicyKind::Clock);
//!
//! // Allocate a run of pages; the first comes back pinned with our content.
//! let mut seed = Page::new();
//! seed.as_mut_slice()[0] = 0xAB;
//! let first = pool.allocate_pages(&mut seed, 4).unwrap();
//! pool.unpin_page(first, UnpinMode::Dirty).unwrap();
//! pool.flush_page(first).unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

pub use common::config::PAGE_SIZE;
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::policy::{PolicyKind, ReplacementPolicy};
pub use buffer::{BufferPool, FrameDescriptor, FrameState, PinMode, UnpinMode, UsageStats};
pub use storage::{DiskManager, Page};
