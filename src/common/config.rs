//! Configuration constants.

/// Size of a page in bytes (4KB).
///
/// Matches the OS page size on most systems, so frames line up with the
/// page cache and Direct I/O alignment requirements.
pub const PAGE_SIZE: usize = 4096;
