use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::common::{PageId, PAGE_SIZE};

use super::buffer_pool_manager::PoolState;
use super::FrameHeader;

/// RAII guard for read-only access to a page.
/// Dropping the guard unpins the page exactly once, so every exit path -
/// including error paths - returns the frame to the pool.
pub struct ReadPageGuard {
    page_id: PageId,
    state: Arc<PoolState>,
    /// Read lock on the page data; dropped before the frame in `drop`
    data: Option<RwLockReadGuard<'static, Box<[u8; PAGE_SIZE]>>>,
    /// Keeps the frame alive for the lifetime of the erased lock guard
    _frame: Arc<FrameHeader>,
}

impl ReadPageGuard {
    pub(crate) fn new(page_id: PageId, frame: Arc<FrameHeader>, state: Arc<PoolState>) -> Self {
        let data = frame.data.read();
        // Safety: the lifetime is erased to 'static, but the lock's owner
        // is the FrameHeader kept alive by the Arc stored alongside, and
        // the guard is dropped first.
        let data: RwLockReadGuard<'static, Box<[u8; PAGE_SIZE]>> =
            unsafe { std::mem::transmute(data) };

        Self {
            page_id,
            state,
            data: Some(data),
            _frame: frame,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data.as_ref().expect("guard data taken")[..]
    }
}

impl Deref for ReadPageGuard {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data()
    }
}

impl Drop for ReadPageGuard {
    fn drop(&mut self) {
        self.data.take();
        self.state.release(self.page_id, false);
    }
}

/// RAII guard for read-write access to a page.
/// The page is marked dirty iff `data_mut` was used; dropping the guard
/// unpins the page exactly once.
pub struct WritePageGuard {
    page_id: PageId,
    state: Arc<PoolState>,
    dirtied: bool,
    /// Write lock on the page data; dropped before the frame in `drop`
    data: Option<RwLockWriteGuard<'static, Box<[u8; PAGE_SIZE]>>>,
    /// Keeps the frame alive for the lifetime of the erased lock guard
    _frame: Arc<FrameHeader>,
}

impl WritePageGuard {
    pub(crate) fn new(page_id: PageId, frame: Arc<FrameHeader>, state: Arc<PoolState>) -> Self {
        let data = frame.data.write();
        // Safety: as for ReadPageGuard - the frame outlives the erased
        // lock guard and the guard is dropped first.
        let data: RwLockWriteGuard<'static, Box<[u8; PAGE_SIZE]>> =
            unsafe { std::mem::transmute(data) };

        Self {
            page_id,
            state,
            dirtied: false,
            data: Some(data),
            _frame: frame,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data.as_ref().expect("guard data taken")[..]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.dirtied = true;
        &mut self.data.as_mut().expect("guard data taken")[..]
    }
}

impl Deref for WritePageGuard {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data()
    }
}

impl DerefMut for WritePageGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.data_mut()
    }
}

impl Drop for WritePageGuard {
    fn drop(&mut self) {
        self.data.take();
        self.state.release(self.page_id, self.dirtied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferPoolManager;
    use crate::storage::disk::DiskManager;
    use tempfile::NamedTempFile;

    fn create_bpm() -> (BufferPoolManager, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = Arc::new(DiskManager::new(temp_file.path()).unwrap());
        (BufferPoolManager::new(4, dm), temp_file)
    }

    #[test]
    fn test_read_guard_unpins_on_drop() {
        let (bpm, _temp) = create_bpm();
        let page_id = bpm.new_page().unwrap();

        let guard = bpm.read_page(page_id).unwrap();
        assert_eq!(guard.page_id(), page_id);
        assert_eq!(bpm.pin_count(page_id), Some(1));

        drop(guard);
        assert_eq!(bpm.pin_count(page_id), Some(0));
    }

    #[test]
    fn test_write_guard_marks_dirty_only_when_written() {
        let (bpm, _temp) = create_bpm();
        let page_id = bpm.new_page().unwrap();

        // A write guard that never touches the data leaves the page clean
        {
            let guard = bpm.write_page(page_id).unwrap();
            assert_eq!(guard.data()[0], 0);
        }

        {
            let mut guard = bpm.write_page(page_id).unwrap();
            guard.data_mut()[0] = 7;
        }

        let guard = bpm.read_page(page_id).unwrap();
        assert_eq!(guard[0], 7);
    }

    #[test]
    fn test_nested_pins_counted() {
        let (bpm, _temp) = create_bpm();
        let page_id = bpm.new_page().unwrap();

        let g1 = bpm.read_page(page_id).unwrap();
        let g2 = bpm.read_page(page_id).unwrap();
        assert_eq!(bpm.pin_count(page_id), Some(2));

        drop(g1);
        assert_eq!(bpm.pin_count(page_id), Some(1));
        drop(g2);
        assert_eq!(bpm.pin_count(page_id), Some(0));
    }
}
