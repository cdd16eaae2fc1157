//! Arbor - a disk-backed B+ tree index on a page-oriented buffer pool
//!
//! Arbor persists fixed-width keys and values in a single backing file of
//! 4 KB pages and keeps a bounded working set of those pages cached in
//! memory. All page access flows through the buffer pool, which enforces
//! pin discipline with RAII guards and evicts in strict LRU order.
//!
//! # Architecture
//!
//! The system is organized into layers, leaves first:
//!
//! - **Storage Layer** (`storage`): disk I/O
//!   - `DiskManager`: reads and writes pages at `page_id * PAGE_SIZE`,
//!     hands out monotonically increasing page IDs
//!
//! - **Buffer Pool** (`buffer`): memory management for pages
//!   - `BufferPoolManager`: resolves page IDs to frames, free list before
//!     eviction, writes dirty victims back
//!   - `LruReplacer`: strict least-recently-unpinned eviction order
//!   - `FrameHeader`: per-frame metadata and page bytes
//!   - `ReadPageGuard`/`WritePageGuard`: RAII pins with guaranteed release
//!
//! - **Index** (`index`): the tree itself
//!   - `BPlusTree`: keyed insert/lookup/remove with splits, merges and
//!     redistribution; header page bookkeeping
//!   - `LeafPage`/`InternalPage`/`HeaderPage`: explicit binary layouts
//!     over raw page bytes
//!   - `IndexIterator`: ordered traversal over the leaf chain
//!   - `FixedCodec`/`IndexKey`: fixed-width key/value encoding, ordering
//!     from the key type's `Ord`
//!
//! # Example
//!
//! ```rust,no_run
//! use arbor::BPlusTree;
//!
//! let mut tree = BPlusTree::<u64, u64>::open("index.db", 64).unwrap();
//!
//! tree.insert(&42, &4200).unwrap();
//! assert_eq!(tree.get(&42).unwrap(), Some(4200));
//!
//! for entry in tree.iter().unwrap() {
//!     let (key, value) = entry.unwrap();
//!     println!("{key} -> {value}");
//! }
//!
//! tree.close().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used types at the crate root
pub use common::{ArborError, FrameId, PageId, Result, PAGE_SIZE};
pub use index::{BPlusTree, FixedCodec, IndexIterator, IndexKey};
