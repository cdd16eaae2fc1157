use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::RwLock;

use crate::common::{FrameId, PageId, PAGE_SIZE};

/// One slot of the buffer pool: a page-sized byte buffer plus the metadata
/// the pool needs to manage it. A frame with no resident page sits on the
/// free list; a resident frame with pin count zero is an eviction
/// candidate, and a pinned frame must never be evicted or reused.
pub struct FrameHeader {
    frame_id: FrameId,
    /// The page currently held by this frame, if any
    resident: RwLock<Option<PageId>>,
    /// Number of live guards holding this frame
    pin_count: AtomicU32,
    /// Set when the buffered bytes diverge from the on-disk page
    dirty: AtomicBool,
    /// Page bytes; guards lock this for the duration of their access
    pub(crate) data: RwLock<Box<[u8; PAGE_SIZE]>>,
}

impl FrameHeader {
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            resident: RwLock::new(None),
            pin_count: AtomicU32::new(0),
            dirty: AtomicBool::new(false),
            data: RwLock::new(Box::new([0u8; PAGE_SIZE])),
        }
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn resident_page(&self) -> Option<PageId> {
        *self.resident.read()
    }

    pub fn set_resident(&self, page_id: Option<PageId>) {
        *self.resident.write() = page_id;
    }

    pub fn pin_count(&self) -> u32 {
        self.pin_count.load(Ordering::Acquire)
    }

    /// Increments the pin count and returns the new value.
    pub fn pin(&self) -> u32 {
        self.pin_count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Decrements the pin count and returns the new value, or None if the
    /// count was already zero. Unpinning below zero is a caller bug the
    /// pool reports rather than wrapping.
    pub fn unpin(&self) -> Option<u32> {
        loop {
            let current = self.pin_count.load(Ordering::Acquire);
            if current == 0 {
                return None;
            }
            if self
                .pin_count
                .compare_exchange(current, current - 1, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Some(current - 1);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.store(dirty, Ordering::Release);
    }

    /// Fills the frame with a page image read from disk.
    pub fn load_from(&self, bytes: &[u8]) {
        assert_eq!(bytes.len(), PAGE_SIZE);
        self.data.write().copy_from_slice(bytes);
    }

    /// Snapshots the frame's bytes, e.g. for writeback.
    pub fn store_to(&self, bytes: &mut [u8]) {
        assert_eq!(bytes.len(), PAGE_SIZE);
        bytes.copy_from_slice(&**self.data.read());
    }

    /// Returns the frame to its empty state.
    pub fn reset(&self) {
        *self.resident.write() = None;
        self.pin_count.store(0, Ordering::Release);
        self.dirty.store(false, Ordering::Release);
        self.data.write().fill(0);
    }
}
