//! Error types for the buffer pool and its page store.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by this crate.
///
/// Buffer-pool errors are reported synchronously to the immediate caller
/// and never retried internally. Violations of the pin/unpin discipline
/// (double free, unpin without pin, free while pinned) are hard failures:
/// tolerating them would corrupt the pin-count invariant pool-wide.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying database file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The page id is not allocated on disk (or was deallocated).
    #[error("page {0} not found on disk")]
    PageNotFound(u32),

    /// No unpinned frame is available to service a miss.
    #[error("buffer pool exhausted: every frame is pinned")]
    PoolExhausted,

    /// In-place initialization was requested for a page that is already
    /// resident. Initialize-in-place implies a fresh slot.
    #[error("page {0} is already resident; in-place initialization refused")]
    DoublePin(u32),

    /// Attempted to unpin a page that is not in the pool.
    #[error("page {0} is not resident in the pool")]
    PageNotResident(u32),

    /// Attempted to unpin a page whose pin count is already zero.
    #[error("page {0} is not pinned")]
    PageNotPinned(u32),

    /// Attempted to free a page that still has active pins.
    #[error("page {0} is still pinned")]
    PagePinned(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(42);
        assert_eq!(format!("{}", err), "page 42 not found on disk");

        let err = Error::PoolExhausted;
        assert_eq!(
            format!("{}", err),
            "buffer pool exhausted: every frame is pinned"
        );

        let err = Error::DoublePin(7);
        assert!(format!("{}", err).contains("already resident"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
        assert!(Error::PoolExhausted.source().is_none());
    }
}
