use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::buffer::BufferPoolManager;
use crate::common::{
    ArborError, PageId, Result, HEADER_PAGE_ID, INVALID_PAGE_ID, MIN_BUFFER_POOL_SIZE,
};
use crate::storage::disk::DiskManager;

use super::header_page::{HeaderPage, HeaderPageRef};
use super::index_iterator::IndexIterator;
use super::internal_page::{InternalPage, InternalPageRef};
use super::key::{FixedCodec, IndexKey};
use super::leaf_page::{LeafPage, LeafPageRef};
use super::node_page::{self, PageType};

/// A disk-backed B+ tree over fixed-width keys and values.
///
/// Internal pages direct the search and leaf pages hold the data; leaves
/// form a doubly linked chain in key order. Keys are unique. The tree
/// shrinks and grows dynamically, borrows every page from the buffer pool
/// for the duration of one operation, and records its root and key count
/// in the header page after each mutation.
pub struct BPlusTree<K: IndexKey, V: FixedCodec> {
    bpm: Arc<BufferPoolManager>,
    /// INVALID_PAGE_ID while the tree is empty
    root_page_id: PageId,
    key_count: u64,
    leaf_max_size: usize,
    internal_max_size: usize,
    _marker: PhantomData<(K, V)>,
}

impl<K: IndexKey, V: FixedCodec> BPlusTree<K, V> {
    /// Opens (creating if needed) a tree whose page fan-out is derived
    /// from the page size.
    pub fn open<P: AsRef<Path>>(path: P, pool_size: usize) -> Result<Self> {
        Self::open_with_capacity(
            path,
            pool_size,
            LeafPage::<K, V>::capacity() - 1,
            InternalPage::<K>::capacity() - 1,
        )
    }

    /// Opens (creating if needed) a tree with explicit per-page maximum
    /// sizes. Small maxima force deep trees, which the scenario tests use.
    pub fn open_with_capacity<P: AsRef<Path>>(
        path: P,
        pool_size: usize,
        leaf_max_size: usize,
        internal_max_size: usize,
    ) -> Result<Self> {
        assert!(
            pool_size >= MIN_BUFFER_POOL_SIZE,
            "pool_size must be at least {MIN_BUFFER_POOL_SIZE}"
        );
        assert!(leaf_max_size >= 2, "leaf max_size must be at least 2");
        assert!(
            internal_max_size >= 3,
            "internal max_size must be at least 3"
        );
        assert!(
            leaf_max_size + 1 <= LeafPage::<K, V>::capacity(),
            "leaf max_size exceeds page capacity"
        );
        assert!(
            internal_max_size + 1 <= InternalPage::<K>::capacity(),
            "internal max_size exceeds page capacity"
        );

        let disk_manager = Arc::new(DiskManager::new(path)?);
        let fresh = disk_manager.num_pages() == 0;
        let bpm = Arc::new(BufferPoolManager::new(pool_size, disk_manager));

        let mut tree = Self {
            bpm,
            root_page_id: INVALID_PAGE_ID,
            key_count: 0,
            leaf_max_size,
            internal_max_size,
            _marker: PhantomData,
        };

        if fresh {
            let header_id = tree.bpm.new_page()?;
            debug_assert_eq!(header_id, HEADER_PAGE_ID);
            {
                let mut guard = tree.bpm.write_page(header_id)?;
                HeaderPage::new(guard.data_mut()).init();
            }
            tree.bpm.flush_page(header_id)?;
        } else {
            let guard = tree.bpm.read_page(HEADER_PAGE_ID)?;
            let header = HeaderPageRef::new(guard.data());
            header.validate()?;
            tree.root_page_id = header.root_page_id();
            tree.key_count = header.key_count();
        }

        Ok(tree)
    }

    /// Returns true if this tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> u64 {
        self.key_count
    }

    /// Inserts a key-value pair. Fails with `DuplicateKey` if the key is
    /// already present, leaving the tree unchanged.
    pub fn insert(&mut self, key: &K, value: &V) -> Result<()> {
        if self.root_page_id == INVALID_PAGE_ID {
            self.start_new_tree(key, value)?;
        } else {
            let leaf_id = self.find_leaf(key)?;
            let overflow = {
                let mut guard = self.bpm.write_page(leaf_id)?;
                {
                    let view = LeafPageRef::<K, V>::new(guard.data());
                    let index = view.key_index(key);
                    if index < view.size() && view.key_at(index) == *key {
                        return Err(ArborError::DuplicateKey);
                    }
                }
                let mut leaf = LeafPage::<K, V>::new(guard.data_mut());
                leaf.insert(key, value);
                leaf.size() > leaf.max_size()
            };
            if overflow {
                self.split_leaf(leaf_id)?;
            }
        }

        self.key_count += 1;
        self.sync_header()
    }

    /// Point lookup. Lookup of an absent key is not an error.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        if self.root_page_id == INVALID_PAGE_ID {
            return Ok(None);
        }
        let leaf_id = self.find_leaf(key)?;
        let guard = self.bpm.read_page(leaf_id)?;
        Ok(LeafPageRef::<K, V>::new(guard.data()).lookup(key))
    }

    /// All values with `low <= key <= high`, in ascending key order.
    pub fn get_range(&self, low: &K, high: &K) -> Result<Vec<V>> {
        let mut result = Vec::new();
        if self.root_page_id == INVALID_PAGE_ID {
            return Ok(result);
        }

        let mut current = Some(self.find_leaf(low)?);
        let mut first = true;

        while let Some(page_id) = current {
            let guard = self.bpm.read_page(page_id)?;
            let leaf = LeafPageRef::<K, V>::new(guard.data());

            let start = if first { leaf.key_index(low) } else { 0 };
            first = false;

            for index in start..leaf.size() {
                if leaf.key_at(index) > *high {
                    return Ok(result);
                }
                result.push(leaf.value_at(index));
            }

            current = leaf.next_leaf();
        }

        Ok(result)
    }

    /// Removes a key and its value. Fails with `KeyNotFound` if the key is
    /// absent, leaving the tree unchanged.
    pub fn remove(&mut self, key: &K) -> Result<()> {
        if self.root_page_id == INVALID_PAGE_ID {
            return Err(ArborError::KeyNotFound);
        }

        let leaf_id = self.find_leaf(key)?;
        let (is_root, size, min_size) = {
            let mut guard = self.bpm.write_page(leaf_id)?;
            let index = {
                let view = LeafPageRef::<K, V>::new(guard.data());
                let index = view.key_index(key);
                if index >= view.size() || view.key_at(index) != *key {
                    return Err(ArborError::KeyNotFound);
                }
                index
            };
            let mut leaf = LeafPage::<K, V>::new(guard.data_mut());
            leaf.remove_at(index);
            (leaf.parent().is_none(), leaf.size(), leaf.min_size())
        };

        if is_root {
            // The root may shrink to any size; at zero the tree is empty
            if size == 0 {
                self.bpm.delete_page(leaf_id)?;
                self.root_page_id = INVALID_PAGE_ID;
                debug!("last key removed, tree is empty");
            }
        } else if size < min_size {
            self.coalesce_or_redistribute(leaf_id)?;
        }

        self.key_count -= 1;
        self.sync_header()
    }

    /// Ordered traversal from the smallest key.
    pub fn iter(&self) -> Result<IndexIterator<K, V>> {
        if self.root_page_id == INVALID_PAGE_ID {
            return Ok(IndexIterator::exhausted(Arc::clone(&self.bpm)));
        }
        let leaf_id = self.leftmost_leaf()?;
        Ok(IndexIterator::new(Arc::clone(&self.bpm), leaf_id, 0))
    }

    /// Ordered traversal from the first key >= `key`.
    pub fn iter_from(&self, key: &K) -> Result<IndexIterator<K, V>> {
        if self.root_page_id == INVALID_PAGE_ID {
            return Ok(IndexIterator::exhausted(Arc::clone(&self.bpm)));
        }
        let leaf_id = self.find_leaf(key)?;
        let index = {
            let guard = self.bpm.read_page(leaf_id)?;
            LeafPageRef::<K, V>::new(guard.data()).key_index(key)
        };
        Ok(IndexIterator::new(Arc::clone(&self.bpm), leaf_id, index))
    }

    /// Writes the header and every dirty page back to disk.
    pub fn flush(&self) -> Result<()> {
        self.sync_header()?;
        self.bpm.flush_all_pages()?;
        self.bpm.disk_manager().sync()
    }

    /// Flushes and closes the tree.
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    pub fn buffer_pool(&self) -> &Arc<BufferPoolManager> {
        &self.bpm
    }

    /// Page ID of the current root, or None while the tree is empty.
    pub fn root_page_id(&self) -> Option<PageId> {
        (self.root_page_id != INVALID_PAGE_ID).then_some(self.root_page_id)
    }

    /// Descends from the root to the leaf covering `key`.
    fn find_leaf(&self, key: &K) -> Result<PageId> {
        let mut current = self.root_page_id;
        loop {
            let next = {
                let guard = self.bpm.read_page(current)?;
                match node_page::page_type(guard.data())? {
                    PageType::Leaf => return Ok(current),
                    PageType::Internal => InternalPageRef::<K>::new(guard.data()).lookup(key),
                }
            };
            current = next;
        }
    }

    /// Descends along the first child to the leftmost leaf.
    fn leftmost_leaf(&self) -> Result<PageId> {
        let mut current = self.root_page_id;
        loop {
            let next = {
                let guard = self.bpm.read_page(current)?;
                match node_page::page_type(guard.data())? {
                    PageType::Leaf => return Ok(current),
                    PageType::Internal => InternalPageRef::<K>::new(guard.data()).child_at(0),
                }
            };
            current = next;
        }
    }

    fn start_new_tree(&mut self, key: &K, value: &V) -> Result<()> {
        let root_id = self.bpm.new_page()?;
        {
            let mut guard = self.bpm.write_page(root_id)?;
            let mut leaf = LeafPage::<K, V>::new(guard.data_mut());
            leaf.init(root_id, self.leaf_max_size);
            leaf.insert(key, value);
        }
        self.root_page_id = root_id;
        debug!("started new tree with root {root_id}");
        Ok(())
    }

    /// Splits an overflowing leaf, splicing the sibling chain and pushing
    /// the new sibling's first key into the parent.
    fn split_leaf(&mut self, leaf_id: PageId) -> Result<()> {
        let sibling_id = self.bpm.new_page()?;

        let (separator, old_next, parent) = {
            let mut leaf_guard = self.bpm.write_page(leaf_id)?;
            let mut sibling_guard = self.bpm.write_page(sibling_id)?;
            let mut leaf = LeafPage::<K, V>::new(leaf_guard.data_mut());
            let mut sibling = LeafPage::<K, V>::new(sibling_guard.data_mut());

            sibling.init(sibling_id, self.leaf_max_size);
            let separator = leaf.move_half_to(&mut sibling);

            let old_next = leaf.next_leaf();
            leaf.set_next_leaf(Some(sibling_id));
            sibling.set_prev_leaf(Some(leaf_id));
            sibling.set_next_leaf(old_next);

            (separator, old_next, leaf.parent())
        };

        if let Some(next_id) = old_next {
            let mut guard = self.bpm.write_page(next_id)?;
            node_page::set_prev(guard.data_mut(), Some(sibling_id));
        }

        debug!("split leaf {leaf_id}, new sibling {sibling_id}");
        self.insert_into_parent(leaf_id, separator, sibling_id, parent)
    }

    /// Splits an overflowing internal page, re-parenting the moved
    /// children and pushing the middle key into the parent.
    fn split_internal(&mut self, page_id: PageId) -> Result<()> {
        let sibling_id = self.bpm.new_page()?;

        let (middle, parent, moved_children) = {
            let mut page_guard = self.bpm.write_page(page_id)?;
            let mut sibling_guard = self.bpm.write_page(sibling_id)?;
            let mut page = InternalPage::<K>::new(page_guard.data_mut());
            let mut sibling = InternalPage::<K>::new(sibling_guard.data_mut());

            sibling.init(sibling_id, self.internal_max_size);
            let middle = page.move_half_to(&mut sibling);

            let moved = (0..sibling.size()).map(|i| sibling.child_at(i)).collect::<Vec<_>>();
            (middle, page.parent(), moved)
        };

        for child_id in moved_children {
            let mut guard = self.bpm.write_page(child_id)?;
            node_page::set_parent(guard.data_mut(), Some(sibling_id));
        }

        debug!("split internal {page_id}, new sibling {sibling_id}");
        self.insert_into_parent(page_id, middle, sibling_id, parent)
    }

    /// Installs `(key, right)` after `left` in its parent, growing a new
    /// root when `left` was the root and cascading splits upward.
    fn insert_into_parent(
        &mut self,
        left_id: PageId,
        key: K,
        right_id: PageId,
        parent: Option<PageId>,
    ) -> Result<()> {
        let Some(parent_id) = parent else {
            let root_id = self.bpm.new_page()?;
            {
                let mut guard = self.bpm.write_page(root_id)?;
                let mut root = InternalPage::<K>::new(guard.data_mut());
                root.init(root_id, self.internal_max_size);
                root.populate_new_root(left_id, &key, right_id);
            }
            for child_id in [left_id, right_id] {
                let mut guard = self.bpm.write_page(child_id)?;
                node_page::set_parent(guard.data_mut(), Some(root_id));
            }
            self.root_page_id = root_id;
            debug!("grew new root {root_id}");
            return Ok(());
        };

        let overflow = {
            let mut guard = self.bpm.write_page(parent_id)?;
            let mut parent = InternalPage::<K>::new(guard.data_mut());
            if !parent.insert_after(left_id, &key, right_id) {
                return Err(ArborError::InvalidPage(format!(
                    "page {left_id} missing from parent {parent_id}"
                )));
            }
            parent.size() > parent.max_size()
        };
        {
            let mut guard = self.bpm.write_page(right_id)?;
            node_page::set_parent(guard.data_mut(), Some(parent_id));
        }

        if overflow {
            self.split_internal(parent_id)?;
        }
        Ok(())
    }

    /// Repairs an underflowing non-root page: move one entry over from a
    /// sibling that can spare it, or merge with a sibling and recurse.
    fn coalesce_or_redistribute(&mut self, page_id: PageId) -> Result<()> {
        let (parent_id, node_type) = {
            let guard = self.bpm.read_page(page_id)?;
            let parent = node_page::parent(guard.data()).ok_or_else(|| {
                ArborError::InvalidPage(format!("underflown page {page_id} has no parent"))
            })?;
            (parent, node_page::page_type(guard.data())?)
        };

        let (index, left_sibling, right_sibling) = {
            let guard = self.bpm.read_page(parent_id)?;
            let parent = InternalPageRef::<K>::new(guard.data());
            let index = parent.child_index(page_id).ok_or_else(|| {
                ArborError::InvalidPage(format!("page {page_id} missing from parent {parent_id}"))
            })?;
            let left = (index > 0).then(|| parent.child_at(index - 1));
            let right = (index + 1 < parent.size()).then(|| parent.child_at(index + 1));
            (index, left, right)
        };

        if let Some(sibling_id) = left_sibling {
            if self.can_spare(sibling_id, node_type)? {
                return self.redistribute(sibling_id, page_id, parent_id, index, node_type, true);
            }
        }
        if let Some(sibling_id) = right_sibling {
            if self.can_spare(sibling_id, node_type)? {
                return self.redistribute(sibling_id, page_id, parent_id, index, node_type, false);
            }
        }

        // Neither sibling can donate; merge the right page of a pair into
        // the left one
        if let Some(sibling_id) = left_sibling {
            self.coalesce(sibling_id, page_id, parent_id, index, node_type)
        } else if let Some(sibling_id) = right_sibling {
            self.coalesce(page_id, sibling_id, parent_id, index + 1, node_type)
        } else {
            Err(ArborError::InvalidPage(format!(
                "page {page_id} has no sibling under parent {parent_id}"
            )))
        }
    }

    /// Whether a sibling can give up one entry and stay at its minimum.
    fn can_spare(&self, page_id: PageId, node_type: PageType) -> Result<bool> {
        let guard = self.bpm.read_page(page_id)?;
        let size = node_page::size(guard.data());
        let max_size = node_page::max_size(guard.data());
        let min_size = match node_type {
            PageType::Leaf => max_size / 2,
            PageType::Internal => (max_size + 1) / 2,
        };
        Ok(size > min_size)
    }

    /// Moves exactly one entry from `sibling_id` into `page_id` across
    /// their shared boundary and refreshes the parent separator. `index`
    /// is the page's slot in the parent.
    fn redistribute(
        &mut self,
        sibling_id: PageId,
        page_id: PageId,
        parent_id: PageId,
        index: usize,
        node_type: PageType,
        from_left: bool,
    ) -> Result<()> {
        debug!("redistributing one entry from {sibling_id} into {page_id}");
        let moved_child = {
            let mut parent_guard = self.bpm.write_page(parent_id)?;
            let mut sibling_guard = self.bpm.write_page(sibling_id)?;
            let mut page_guard = self.bpm.write_page(page_id)?;
            let mut parent = InternalPage::<K>::new(parent_guard.data_mut());

            match node_type {
                PageType::Leaf => {
                    let mut sibling = LeafPage::<K, V>::new(sibling_guard.data_mut());
                    let mut page = LeafPage::<K, V>::new(page_guard.data_mut());
                    if from_left {
                        sibling.move_last_to_front_of(&mut page);
                        parent.set_key_at(index, &page.key_at(0));
                    } else {
                        sibling.move_first_to_end_of(&mut page);
                        parent.set_key_at(index + 1, &sibling.key_at(0));
                    }
                    None
                }
                PageType::Internal => {
                    let mut sibling = InternalPage::<K>::new(sibling_guard.data_mut());
                    let mut page = InternalPage::<K>::new(page_guard.data_mut());
                    if from_left {
                        let middle = parent.key_at(index);
                        let new_separator = sibling.move_last_to_front_of(&mut page, &middle);
                        parent.set_key_at(index, &new_separator);
                        Some(page.child_at(0))
                    } else {
                        let middle = parent.key_at(index + 1);
                        let new_separator = sibling.move_first_to_end_of(&mut page, &middle);
                        parent.set_key_at(index + 1, &new_separator);
                        Some(page.child_at(page.size() - 1))
                    }
                }
            }
        };

        if let Some(child_id) = moved_child {
            let mut guard = self.bpm.write_page(child_id)?;
            node_page::set_parent(guard.data_mut(), Some(page_id));
        }
        Ok(())
    }

    /// Merges `right_id` into `left_id`, removes the separator at
    /// `separator_index` from the parent, frees the right page and repairs
    /// the parent if it underflowed.
    fn coalesce(
        &mut self,
        left_id: PageId,
        right_id: PageId,
        parent_id: PageId,
        separator_index: usize,
        node_type: PageType,
    ) -> Result<()> {
        debug!("coalescing {right_id} into {left_id}");
        let (next_leaf, moved_children) = {
            let mut parent_guard = self.bpm.write_page(parent_id)?;
            let mut left_guard = self.bpm.write_page(left_id)?;
            let mut right_guard = self.bpm.write_page(right_id)?;
            let mut parent = InternalPage::<K>::new(parent_guard.data_mut());

            let mut next_leaf = None;
            let mut moved_children = Vec::new();
            match node_type {
                PageType::Leaf => {
                    let mut left = LeafPage::<K, V>::new(left_guard.data_mut());
                    let mut right = LeafPage::<K, V>::new(right_guard.data_mut());
                    right.move_all_to(&mut left);
                    next_leaf = right.next_leaf();
                    left.set_next_leaf(next_leaf);
                }
                PageType::Internal => {
                    let middle = parent.key_at(separator_index);
                    let mut left = InternalPage::<K>::new(left_guard.data_mut());
                    let mut right = InternalPage::<K>::new(right_guard.data_mut());
                    let start = left.size();
                    right.move_all_to(&mut left, &middle);
                    moved_children = (start..left.size()).map(|i| left.child_at(i)).collect();
                }
            }
            parent.remove_at(separator_index);
            (next_leaf, moved_children)
        };

        if let Some(next_id) = next_leaf {
            let mut guard = self.bpm.write_page(next_id)?;
            node_page::set_prev(guard.data_mut(), Some(left_id));
        }
        for child_id in moved_children {
            let mut guard = self.bpm.write_page(child_id)?;
            node_page::set_parent(guard.data_mut(), Some(left_id));
        }

        self.bpm.delete_page(right_id)?;

        let (parent_is_root, parent_size, parent_min) = {
            let guard = self.bpm.read_page(parent_id)?;
            let is_root = node_page::parent(guard.data()).is_none();
            let size = node_page::size(guard.data());
            let min = (node_page::max_size(guard.data()) + 1) / 2;
            (is_root, size, min)
        };

        if parent_is_root {
            // An internal root may hold as few as two children; at one it
            // collapses into that child
            if parent_size == 1 {
                self.adjust_root()?;
            }
        } else if parent_size < parent_min {
            self.coalesce_or_redistribute(parent_id)?;
        }
        Ok(())
    }

    /// Replaces a single-child internal root with its child.
    fn adjust_root(&mut self) -> Result<()> {
        let old_root_id = self.root_page_id;
        let child_id = {
            let guard = self.bpm.read_page(old_root_id)?;
            InternalPageRef::<K>::new(guard.data()).child_at(0)
        };
        {
            let mut guard = self.bpm.write_page(child_id)?;
            node_page::set_parent(guard.data_mut(), None);
        }
        self.bpm.delete_page(old_root_id)?;
        self.root_page_id = child_id;
        debug!("root collapsed into {child_id}");
        Ok(())
    }

    /// Records the root and key count in the header page. The page stays
    /// resident, so this is a cheap in-pool write.
    fn sync_header(&self) -> Result<()> {
        let mut guard = self.bpm.write_page(HEADER_PAGE_ID)?;
        let mut header = HeaderPage::new(guard.data_mut());
        header.set_root_page_id(self.root_page_id);
        header.set_key_count(self.key_count);
        Ok(())
    }
}

impl<K: IndexKey, V: FixedCodec> Drop for BPlusTree<K, V> {
    fn drop(&mut self) {
        let _ = self.sync_header();
        let _ = self.bpm.flush_all_pages();
        let _ = self.bpm.disk_manager().sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_tree(leaf_max: usize, internal_max: usize) -> (BPlusTree<u32, u64>, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let tree =
            BPlusTree::open_with_capacity(temp_file.path(), 16, leaf_max, internal_max).unwrap();
        (tree, temp_file)
    }

    #[test]
    fn test_empty_tree() {
        let (tree, _temp) = create_tree(4, 4);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.get(&1).unwrap(), None);
    }

    #[test]
    fn test_insert_and_get() {
        let (mut tree, _temp) = create_tree(4, 4);

        tree.insert(&10, &100).unwrap();
        tree.insert(&20, &200).unwrap();
        tree.insert(&30, &300).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&10).unwrap(), Some(100));
        assert_eq!(tree.get(&20).unwrap(), Some(200));
        assert_eq!(tree.get(&30).unwrap(), Some(300));
        assert_eq!(tree.get(&40).unwrap(), None);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let (mut tree, _temp) = create_tree(4, 4);

        tree.insert(&10, &100).unwrap();
        assert!(matches!(
            tree.insert(&10, &999),
            Err(ArborError::DuplicateKey)
        ));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&10).unwrap(), Some(100));
    }

    #[test]
    fn test_remove_absent_key_fails() {
        let (mut tree, _temp) = create_tree(4, 4);

        assert!(matches!(tree.remove(&1), Err(ArborError::KeyNotFound)));

        tree.insert(&10, &100).unwrap();
        assert!(matches!(tree.remove(&11), Err(ArborError::KeyNotFound)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_splits_root_leaf() {
        let (mut tree, _temp) = create_tree(4, 4);

        for k in 1..=5u32 {
            tree.insert(&k, &(k as u64 * 10)).unwrap();
        }

        for k in 1..=5u32 {
            assert_eq!(tree.get(&k).unwrap(), Some(k as u64 * 10), "key {k}");
        }
    }

    #[test]
    fn test_single_insert_remove_empties_tree() {
        let (mut tree, _temp) = create_tree(4, 4);

        tree.insert(&7, &70).unwrap();
        assert!(!tree.is_empty());

        tree.remove(&7).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.get(&7).unwrap(), None);

        // The tree grows again from empty
        tree.insert(&8, &80).unwrap();
        assert_eq!(tree.get(&8).unwrap(), Some(80));
    }
}
