//! Error types for the page layer.

use std::fmt;

use thiserror::Error;
use crate::types::PageId;

/// Result type alias for page operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Mutation that can run a page out of space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A new slot was being added
    Insert { index: usize },
    /// An existing slot was being replaced
    Update { index: usize },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { index } => write!(f, "insert at slot {}", index),
            Self::Update { index } => write!(f, "update of slot {}", index),
        }
    }
}

/// Errors that can occur in the page layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// The mutation would push the page past its configured maximum size.
    /// The page is left untouched; the caller is expected to split.
    #[error("Page {page_id} is full: {op} needs {projected} bytes (max: {max})")]
    PageFull {
        page_id: PageId,
        op: Mutation,
        projected: usize,
        max: usize,
    },

    /// Caller-supplied key bytes differ from the key embedded in the record
    #[error("Key bytes do not match the record's key on page {page_id}")]
    KeyBytesMismatch { page_id: PageId },

    /// A value could not be encoded or decoded with its schema
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid table or schema definition
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Table definition could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data corruption detected while reading a page buffer
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl StorageError {
    /// Create a codec error with a message
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a schema error with a message
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Whether the caller can recover by splitting the page and retrying
    pub fn is_page_full(&self) -> bool {
        matches!(self, Self::PageFull { .. })
    }
}
