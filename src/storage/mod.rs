//! Storage layer - page-granular disk I/O.
//!
//! - [`DiskManager`] - allocates, deallocates, reads and writes pages on a
//!   single database file
//! - [`Page`] - the fixed-size byte container exchanged with the pool

mod disk_manager;
mod page;

pub use disk_manager::DiskManager;
pub use page::Page;
