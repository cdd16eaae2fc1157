use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::common::{ArborError, FrameId, PageId, Result, INVALID_PAGE_ID, PAGE_SIZE};
use crate::storage::disk::DiskManager;

use super::{FrameHeader, LruReplacer, ReadPageGuard, WritePageGuard};

/// Shared pool state; page guards release through it on drop.
pub(crate) struct PoolState {
    /// The buffer pool frames
    frames: Vec<Arc<FrameHeader>>,
    /// Page table: maps resident page IDs to frame IDs
    page_table: Mutex<HashMap<PageId, FrameId>>,
    /// Frames not currently holding any page
    free_list: Mutex<VecDeque<FrameId>>,
    /// Strict-LRU eviction order over unpinned frames
    replacer: LruReplacer,
}

impl PoolState {
    /// Unpins a resident page once, ORing in the dirty flag. Returns false
    /// if the page is not resident or its pin count is already zero.
    /// Reaching zero makes the frame a replacer candidate.
    pub(crate) fn release(&self, page_id: PageId, mark_dirty: bool) -> bool {
        let page_table = self.page_table.lock();
        let Some(&frame_id) = page_table.get(&page_id) else {
            return false;
        };
        let frame = &self.frames[frame_id.index()];
        if mark_dirty {
            frame.set_dirty(true);
        }
        match frame.unpin() {
            Some(0) => {
                self.replacer.record_unpinned(frame_id);
                true
            }
            Some(_) => true,
            None => false,
        }
    }
}

/// BufferPoolManager mediates all page access between callers and disk.
/// It owns a fixed set of frames, satisfies fetch/new/delete/flush
/// requests from a free list before evicting through the LRU replacer,
/// and enforces pin discipline via RAII page guards.
pub struct BufferPoolManager {
    /// Number of frames in the buffer pool
    pool_size: usize,
    /// Shared state, also held by outstanding page guards
    state: Arc<PoolState>,
    /// Backing store; all I/O is blocking and inline
    disk_manager: Arc<DiskManager>,
}

impl BufferPoolManager {
    /// Creates a new BufferPoolManager with the given pool size and disk
    /// manager.
    pub fn new(pool_size: usize, disk_manager: Arc<DiskManager>) -> Self {
        let mut frames = Vec::with_capacity(pool_size);
        let mut free_list = VecDeque::with_capacity(pool_size);

        for i in 0..pool_size {
            let frame_id = FrameId::new(i as u32);
            frames.push(Arc::new(FrameHeader::new(frame_id)));
            free_list.push_back(frame_id);
        }

        let state = Arc::new(PoolState {
            frames,
            page_table: Mutex::new(HashMap::new()),
            free_list: Mutex::new(free_list),
            replacer: LruReplacer::new(),
        });

        Self {
            pool_size,
            state,
            disk_manager,
        }
    }

    /// Allocates a new page and installs it in the pool, zero-initialized.
    /// The page starts unpinned and evictable; take a guard to pin it.
    pub fn new_page(&self) -> Result<PageId> {
        let frame_id = self.acquire_frame()?;
        let frame = &self.state.frames[frame_id.index()];

        let page_id = self.disk_manager.allocate_page()?;

        frame.reset();
        frame.set_resident(Some(page_id));

        self.state.page_table.lock().insert(page_id, frame_id);
        self.state.replacer.record_unpinned(frame_id);

        Ok(page_id)
    }

    /// Fetches a page for read access, pinning it for the guard's lifetime.
    pub fn read_page(&self, page_id: PageId) -> Result<ReadPageGuard> {
        let frame = self.fetch_frame(page_id)?;
        Ok(ReadPageGuard::new(page_id, frame, Arc::clone(&self.state)))
    }

    /// Fetches a page for write access, pinning it for the guard's lifetime.
    /// The page is marked dirty iff the guard's `data_mut` is used.
    pub fn write_page(&self, page_id: PageId) -> Result<WritePageGuard> {
        let frame = self.fetch_frame(page_id)?;
        Ok(WritePageGuard::new(page_id, frame, Arc::clone(&self.state)))
    }

    /// Explicitly unpins a resident page once. Returns false if the page
    /// is not resident or its pin count is already zero. Guards route
    /// through the same path on drop.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        self.state.release(page_id, is_dirty)
    }

    /// Writes a resident page back to disk and clears its dirty flag.
    /// Returns false if the page is not resident.
    pub fn flush_page(&self, page_id: PageId) -> Result<bool> {
        if page_id == INVALID_PAGE_ID {
            return Err(ArborError::InvalidPageId(page_id));
        }

        let page_table = self.state.page_table.lock();

        if let Some(&frame_id) = page_table.get(&page_id) {
            let frame = &self.state.frames[frame_id.index()];

            let mut data = [0u8; PAGE_SIZE];
            frame.store_to(&mut data);
            self.disk_manager.write_page(page_id, &data)?;
            frame.set_dirty(false);

            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Writes every dirty resident page back to disk.
    pub fn flush_all_pages(&self) -> Result<()> {
        let page_table = self.state.page_table.lock();

        for (&page_id, &frame_id) in page_table.iter() {
            let frame = &self.state.frames[frame_id.index()];

            if frame.is_dirty() {
                let mut data = [0u8; PAGE_SIZE];
                frame.store_to(&mut data);
                self.disk_manager.write_page(page_id, &data)?;
                frame.set_dirty(false);
            }
        }

        Ok(())
    }

    /// Removes a page from the pool and deallocates it on disk.
    /// Returns Ok(false) if the page is not resident and fails with
    /// `PageStillPinned` if a caller still holds it.
    pub fn delete_page(&self, page_id: PageId) -> Result<bool> {
        let mut page_table = self.state.page_table.lock();

        let Some(&frame_id) = page_table.get(&page_id) else {
            return Ok(false);
        };
        let frame = &self.state.frames[frame_id.index()];

        if frame.pin_count() > 0 {
            return Err(ArborError::PageStillPinned(page_id));
        }

        page_table.remove(&page_id);
        self.state.replacer.erase(frame_id);
        frame.reset();
        self.state.free_list.lock().push_back(frame_id);

        self.disk_manager.deallocate_page(page_id)?;

        Ok(true)
    }

    /// Returns the pin count of a resident page.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        let page_table = self.state.page_table.lock();

        page_table
            .get(&page_id)
            .map(|&frame_id| self.state.frames[frame_id.index()].pin_count())
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn free_frame_count(&self) -> usize {
        self.state.free_list.lock().len()
    }

    pub fn disk_manager(&self) -> &Arc<DiskManager> {
        &self.disk_manager
    }

    /// Resolves a page ID to a pinned frame, reading from disk on a miss.
    fn fetch_frame(&self, page_id: PageId) -> Result<Arc<FrameHeader>> {
        if page_id == INVALID_PAGE_ID {
            return Err(ArborError::InvalidPageId(page_id));
        }

        // Page-table hit: pin and drop out of victim candidacy
        {
            let page_table = self.state.page_table.lock();
            if let Some(&frame_id) = page_table.get(&page_id) {
                let frame = &self.state.frames[frame_id.index()];
                frame.pin();
                self.state.replacer.erase(frame_id);
                return Ok(Arc::clone(frame));
            }
        }

        // Miss: take a frame and read the page from disk
        let frame_id = self.acquire_frame()?;
        let frame = &self.state.frames[frame_id.index()];

        let mut data = [0u8; PAGE_SIZE];
        self.disk_manager.read_page(page_id, &mut data)?;

        frame.set_resident(Some(page_id));
        frame.load_from(&data);
        frame.set_dirty(false);
        frame.pin();

        self.state.page_table.lock().insert(page_id, frame_id);

        Ok(Arc::clone(frame))
    }

    /// Obtains an empty frame, from the free list first, then by evicting
    /// the LRU victim (writing it back iff dirty).
    fn acquire_frame(&self) -> Result<FrameId> {
        {
            let mut free_list = self.state.free_list.lock();
            if let Some(frame_id) = free_list.pop_front() {
                return Ok(frame_id);
            }
        }

        let Some(frame_id) = self.state.replacer.victim() else {
            return Err(ArborError::BufferPoolExhausted);
        };
        let frame = &self.state.frames[frame_id.index()];

        if let Some(old_page_id) = frame.resident_page() {
            if frame.is_dirty() {
                debug!("evicting dirty page {old_page_id}, writing back");
                let mut data = [0u8; PAGE_SIZE];
                frame.store_to(&mut data);
                self.disk_manager.write_page(old_page_id, &data)?;
            }
            self.state.page_table.lock().remove(&old_page_id);
        }
        frame.reset();

        Ok(frame_id)
    }
}
