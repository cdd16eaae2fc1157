use thiserror::Error;

use super::types::PageId;

/// Index error types
#[derive(Error, Debug)]
pub enum ArborError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("buffer pool exhausted, no evictable frame available")]
    BufferPoolExhausted,

    #[error("page {0} is still pinned")]
    PageStillPinned(PageId),

    #[error("invalid page ID: {0}")]
    InvalidPageId(PageId),

    #[error("duplicate key")]
    DuplicateKey,

    #[error("key not found")]
    KeyNotFound,

    #[error("invalid page: {0}")]
    InvalidPage(String),
}

pub type Result<T> = std::result::Result<T, ArborError>;
