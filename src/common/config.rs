/// Size of a page in bytes (4 KB)
pub const PAGE_SIZE: usize = 4096;

/// Invalid page ID constant
pub const INVALID_PAGE_ID: PageId = PageId(u32::MAX);

/// The header page always lives at the start of the backing file.
pub const HEADER_PAGE_ID: PageId = PageId(0);

/// Default buffer pool size (number of frames)
pub const DEFAULT_BUFFER_POOL_SIZE: usize = 64;

/// Smallest pool a tree will accept. A delete cascade pins a parent, two
/// siblings, a re-parented child and the header page at the same time.
pub const MIN_BUFFER_POOL_SIZE: usize = 8;

use super::types::PageId;
