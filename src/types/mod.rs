//! Common types used throughout the page layer.

mod page_id;
mod varint;

pub use page_id::PageId;
pub use varint::{
    decode_varint, encode_varint, varint_size, write_varint, zigzag_decode, zigzag_encode,
};

use serde::{Deserialize, Serialize};

/// Default maximum page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Size of the fixed page header (id, kind, previous id, next id)
pub const PAGE_HEADER_SIZE: usize = 13;

/// Serialized size of a page holding no records: the header plus the
/// terminator of the (empty) records array.
pub const EMPTY_PAGE_SIZE: usize = PAGE_HEADER_SIZE + 1;

/// Page sizing configuration, shared by every page of a table.
///
/// Deserialization goes through [`PageConfig::new`], so the limit is never
/// below [`EMPTY_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPageConfig")]
pub struct PageConfig {
    /// Largest serialized size a page may reach after a mutation
    max_page_size: usize,
}

/// Unchecked JSON shape of [`PageConfig`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageConfig {
    max_page_size: usize,
}

impl From<RawPageConfig> for PageConfig {
    fn from(raw: RawPageConfig) -> Self {
        Self::new(raw.max_page_size)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_page_size: PAGE_SIZE,
        }
    }
}

impl PageConfig {
    /// Create a config with a custom maximum page size.
    ///
    /// The limit never goes below the size of an empty page.
    pub fn new(max_page_size: usize) -> Self {
        Self {
            max_page_size: max_page_size.max(EMPTY_PAGE_SIZE),
        }
    }

    /// Largest serialized size a page may reach after a mutation
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }
}

/// Node kinds stored in the page header
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Internal node: separator keys pointing at child pages
    Internal = 0x02,
    /// Leaf node: full records, linked to its siblings
    #[default]
    Leaf = 0x0D,
}

impl NodeKind {
    /// Check if this is a leaf node
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Check if this is an internal node
    pub fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Convert from byte value
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x02 => Some(Self::Internal),
            0x0D => Some(Self::Leaf),
            _ => None,
        }
    }
}
