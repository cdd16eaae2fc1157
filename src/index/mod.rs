mod b_plus_tree;
mod header_page;
mod index_iterator;
mod internal_page;
mod key;
mod leaf_page;
mod node_page;

pub use b_plus_tree::BPlusTree;
pub use header_page::{HeaderPage, HeaderPageRef};
pub use index_iterator::IndexIterator;
pub use internal_page::{InternalPage, InternalPageRef};
pub use key::{FixedCodec, IndexKey};
pub use leaf_page::{LeafPage, LeafPageRef};
pub use node_page::{page_type, PageType, NODE_HEADER_SIZE};
