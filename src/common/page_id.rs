//! Page identifier type.

use std::fmt;

/// Identifies a page on disk.
///
/// A `u32` id addresses 4 billion pages, 16TB at 4KB per page. The value
/// `u32::MAX` is reserved as the "no page" sentinel; it is what an empty
/// frame descriptor carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Sentinel for "no page" / uninitialized state.
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Whether this id refers to an actual page (not the sentinel).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// The page id `offset` positions after this one.
    ///
    /// Used to walk a contiguous allocation run.
    #[inline]
    pub fn advance(&self, offset: u32) -> PageId {
        PageId(self.0 + offset)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "Page(INVALID)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}
