//! Disk Manager - low-level file I/O for database pages.
//!
//! The [`DiskManager`] owns the on-disk allocation state:
//! - Reading and writing whole pages
//! - Allocating contiguous runs of page ids
//! - Deallocating ids back into a free set for reuse

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;

/// Manages disk I/O for a single database file.
///
/// # File Layout
/// Pages are laid out sequentially; page N lives at offset `N * PAGE_SIZE`.
///
/// # Allocation
/// `allocate_run` hands out contiguous page ids. Deallocated ids are kept
/// in a sorted free set and reused when a contiguous stretch of the
/// requested length exists there; otherwise the file is extended with
/// zeroed pages. The file never shrinks.
///
/// # Thread Safety
/// `DiskManager` is single-threaded; the [`BufferPool`] serializes access.
///
/// # Durability
/// Writes are followed by `fsync()`.
///
/// [`BufferPool`]: crate::buffer::BufferPool
pub struct DiskManager {
    file: File,
    /// Number of pages the file spans, including freed ones.
    page_count: u32,
    /// Deallocated page ids available for reuse.
    free_set: BTreeSet<u32>,
}

impl DiskManager {
    /// Create a new database file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            page_count: 0,
            free_set: BTreeSet::new(),
        })
    }

    /// Open an existing database file.
    ///
    /// The free set is not persisted; ids freed in an earlier session are
    /// not reused after reopening.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let metadata = file.metadata()?;
        let page_count = (metadata.len() / PAGE_SIZE as u64) as u32;

        Ok(Self {
            file,
            page_count,
            free_set: BTreeSet::new(),
        })
    }

    /// Open an existing database file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Allocate `run_length` contiguous pages, returning the first id.
    ///
    /// New pages are zero-filled.
    ///
    /// # Panics
    /// Panics if `run_length` is 0.
    pub fn allocate_run(&mut self, run_length: u32) -> Result<PageId> {
        assert!(run_length > 0, "run_length must be > 0");

        if let Some(first) = self.find_free_run(run_length) {
            for id in first..first + run_length {
                self.free_set.remove(&id);
            }
            return Ok(PageId::new(first));
        }

        // Extend the file with zeroed pages.
        let first = self.page_count;
        let offset = (first as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let zeros = [0u8; PAGE_SIZE];
        for _ in 0..run_length {
            self.file.write_all(&zeros)?;
        }
        self.file.sync_all()?;

        self.page_count += run_length;
        Ok(PageId::new(first))
    }

    /// Deallocate a single page, returning its id to the free set.
    ///
    /// # Errors
    /// `Error::PageNotFound` if the id was never allocated or is already
    /// free (double free).
    pub fn deallocate_page(&mut self, page_id: PageId) -> Result<()> {
        self.check_allocated(page_id)?;
        self.free_set.insert(page_id.0);
        Ok(())
    }

    /// Deallocate `run_length` contiguous pages starting at `first`.
    pub fn deallocate_run(&mut self, first: PageId, run_length: u32) -> Result<()> {
        for i in 0..run_length {
            self.deallocate_page(first.advance(i))?;
        }
        Ok(())
    }

    /// Read a page from disk into `dest`.
    ///
    /// # Errors
    /// `Error::PageNotFound` if the page is not currently allocated.
    pub fn read_page_into(&mut self, page_id: PageId, dest: &mut Page) -> Result<()> {
        self.check_allocated(page_id)?;

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(dest.as_mut_slice())?;

        Ok(())
    }

    /// Write a page to disk.
    ///
    /// # Errors
    /// `Error::PageNotFound` if the page is not currently allocated.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        self.check_allocated(page_id)?;

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_all()?;

        Ok(())
    }

    /// Number of pages the file spans (allocated plus freed).
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Total size of the database file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }

    fn check_allocated(&self, page_id: PageId) -> Result<()> {
        if !page_id.is_valid() || page_id.0 >= self.page_count || self.free_set.contains(&page_id.0)
        {
            return Err(Error::PageNotFound(page_id.0));
        }
        Ok(())
    }

    /// First id of a stretch of `run_length` consecutive ids in the free
    /// set, if one exists.
    fn find_free_run(&self, run_length: u32) -> Option<u32> {
        let mut start = None;
        let mut len = 0;

        for &id in &self.free_set {
            match start {
                Some(s) if id == s + len => len += 1,
                _ => {
                    start = Some(id);
                    len = 1;
                }
            }
            if len == run_length {
                return start;
            }
        }
        None
    }
}
