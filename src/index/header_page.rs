use bytes::{Buf, BufMut};

use crate::common::{ArborError, PageId, Result, INVALID_PAGE_ID, PAGE_SIZE};

/// Identifies a page-0 written by this index; also serves as a version tag.
const HEADER_MAGIC: u32 = 0x4152_4231; // "ARB1"

const MAGIC_OFFSET: usize = 0;
const ROOT_OFFSET: usize = 4;
const KEY_COUNT_OFFSET: usize = 8;

/// Mutable view over the header page (page 0): magic number, root page id
/// and the total key count. The page-allocation counter lives in the
/// DiskManager, so nothing else is stored here.
pub struct HeaderPage<'a> {
    data: &'a mut [u8],
}

impl<'a> HeaderPage<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        assert_eq!(data.len(), PAGE_SIZE);
        Self { data }
    }

    pub fn init(&mut self) {
        self.data.fill(0);
        (&mut self.data[MAGIC_OFFSET..]).put_u32_le(HEADER_MAGIC);
        self.set_root_page_id(INVALID_PAGE_ID);
        self.set_key_count(0);
    }

    pub fn set_root_page_id(&mut self, root: PageId) {
        (&mut self.data[ROOT_OFFSET..]).put_u32_le(root.raw());
    }

    pub fn set_key_count(&mut self, count: u64) {
        (&mut self.data[KEY_COUNT_OFFSET..]).put_u64_le(count);
    }
}

/// Read-only view over the header page.
pub struct HeaderPageRef<'a> {
    data: &'a [u8],
}

impl<'a> HeaderPageRef<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        assert_eq!(data.len(), PAGE_SIZE);
        Self { data }
    }

    /// Fails with `InvalidPage` if the magic number does not match,
    /// i.e. the file was not written by this index.
    pub fn validate(&self) -> Result<()> {
        let magic = (&self.data[MAGIC_OFFSET..]).get_u32_le();
        if magic != HEADER_MAGIC {
            return Err(ArborError::InvalidPage(format!(
                "bad header magic {magic:#010x}"
            )));
        }
        Ok(())
    }

    pub fn root_page_id(&self) -> PageId {
        PageId::new((&self.data[ROOT_OFFSET..]).get_u32_le())
    }

    pub fn key_count(&self) -> u64 {
        (&self.data[KEY_COUNT_OFFSET..]).get_u64_le()
    }
}
