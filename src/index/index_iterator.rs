use std::marker::PhantomData;
use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{PageId, Result, INVALID_PAGE_ID};

use super::key::{FixedCodec, IndexKey};
use super::leaf_page::LeafPageRef;

/// Lazy ascending traversal of the leaf chain from a given position.
///
/// The position is a (leaf page id, in-leaf offset) pair; advancing past
/// the end of a leaf follows its `next` link. Mutating the tree while an
/// iterator is live invalidates it; construct a fresh one instead.
pub struct IndexIterator<K: IndexKey, V: FixedCodec> {
    bpm: Arc<BufferPoolManager>,
    /// INVALID_PAGE_ID once the iterator is exhausted
    current_page_id: PageId,
    current_index: usize,
    _marker: PhantomData<(K, V)>,
}

impl<K: IndexKey, V: FixedCodec> IndexIterator<K, V> {
    pub(crate) fn new(bpm: Arc<BufferPoolManager>, page_id: PageId, index: usize) -> Self {
        Self {
            bpm,
            current_page_id: page_id,
            current_index: index,
            _marker: PhantomData,
        }
    }

    /// An iterator that yields nothing, for the empty tree.
    pub(crate) fn exhausted(bpm: Arc<BufferPoolManager>) -> Self {
        Self::new(bpm, INVALID_PAGE_ID, 0)
    }

    /// Returns the next entry, or None past the last leaf's end.
    pub fn next_entry(&mut self) -> Result<Option<(K, V)>> {
        while self.current_page_id != INVALID_PAGE_ID {
            let next = {
                let guard = self.bpm.read_page(self.current_page_id)?;
                let leaf = LeafPageRef::<K, V>::new(guard.data());

                if self.current_index < leaf.size() {
                    let entry = (
                        leaf.key_at(self.current_index),
                        leaf.value_at(self.current_index),
                    );
                    self.current_index += 1;
                    return Ok(Some(entry));
                }

                leaf.next_leaf()
            };

            self.current_page_id = next.unwrap_or(INVALID_PAGE_ID);
            self.current_index = 0;
        }

        Ok(None)
    }
}

/// Iterators are equal when they sit on the same leaf offset (or are both
/// exhausted), regardless of which tree handle produced them.
impl<K: IndexKey, V: FixedCodec> PartialEq for IndexIterator<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.current_page_id == other.current_page_id && self.current_index == other.current_index
    }
}

impl<K: IndexKey, V: FixedCodec> Eq for IndexIterator<K, V> {}

impl<K: IndexKey, V: FixedCodec> Iterator for IndexIterator<K, V> {
    type Item = Result<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
