use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::common::{PageId, Result, PAGE_SIZE};

/// Durable page store: a single backing file of consecutive `PAGE_SIZE`
/// blocks, addressed by page id. All I/O is blocking and performed
/// inline; caching is the buffer pool's job, not ours.
///
/// Page ids are handed out by a monotonically increasing counter that is
/// recovered from the file length at open, so ids are never reused across
/// restarts. Allocation zero-writes the new page, which is what keeps the
/// counter and the file length in step.
pub struct DiskManager {
    file: Mutex<File>,
    /// Pages allocated so far, == file length / PAGE_SIZE
    next_page: AtomicU32,
    /// I/O counters, for cache-behaviour assertions in tests
    reads: AtomicU32,
    writes: AtomicU32,
}

impl DiskManager {
    /// Opens the backing file, creating it if absent.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let len = file.metadata()?.len();

        Ok(Self {
            file: Mutex::new(file),
            next_page: AtomicU32::new((len / PAGE_SIZE as u64) as u32),
            reads: AtomicU32::new(0),
            writes: AtomicU32::new(0),
        })
    }

    /// Reads one page into `buf`, which must be exactly `PAGE_SIZE` bytes.
    ///
    /// A read past the end of the file zero-fills the tail of the buffer;
    /// that is the uniform contract for pages that were allocated but
    /// never written back.
    pub fn read_page(&self, page_id: PageId, buf: &mut [u8]) -> Result<()> {
        assert_eq!(buf.len(), PAGE_SIZE, "buffer must be PAGE_SIZE bytes");

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(page_id.file_offset()))?;

        let n = file.read(buf)?;
        if n < PAGE_SIZE {
            buf[n..].fill(0);
        }

        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Writes one page from `buf`, which must be exactly `PAGE_SIZE` bytes.
    pub fn write_page(&self, page_id: PageId, buf: &[u8]) -> Result<()> {
        assert_eq!(buf.len(), PAGE_SIZE, "buffer must be PAGE_SIZE bytes");

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(page_id.file_offset()))?;
        file.write_all(buf)?;
        file.flush()?;

        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Hands out the next page id, extending the file with a zeroed page.
    pub fn allocate_page(&self) -> Result<PageId> {
        let page_id = PageId::new(self.next_page.fetch_add(1, Ordering::SeqCst));
        self.write_page(page_id, &[0u8; PAGE_SIZE])?;
        Ok(page_id)
    }

    /// Releases a page id. The space is not reclaimed; the id simply goes
    /// out of use. An on-disk free list could be layered here later.
    pub fn deallocate_page(&self, _page_id: PageId) -> Result<()> {
        Ok(())
    }

    /// Number of pages allocated so far.
    pub fn num_pages(&self) -> u32 {
        self.next_page.load(Ordering::Relaxed)
    }

    pub fn num_reads(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn num_writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Forces everything written so far down to stable storage.
    pub fn sync(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }
}

impl Drop for DiskManager {
    fn drop(&mut self) {
        let _ = self.file.get_mut().sync_all();
    }
}
