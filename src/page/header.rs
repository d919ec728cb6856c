//! Page header structure.
//!
//! The header occupies the first bytes of every page and is fixed-size, so
//! the tree layer can rewrite the kind and sibling links without touching
//! the page's byte accounting.

use crate::error::{Result, StorageError};
use crate::types::{NodeKind, PageId, PAGE_HEADER_SIZE};

/// Page header structure
///
/// Layout (13 bytes):
/// ```text
/// Offset  Size  Description
/// 0       4     Page id
/// 4       1     Node kind flag
/// 5       4     Previous sibling page id (u32::MAX if none)
/// 9       4     Next sibling page id (u32::MAX if none)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Identifier of this page
    pub id: PageId,
    /// Leaf or internal
    pub kind: NodeKind,
    /// Left sibling on the same tree level
    pub previous_id: PageId,
    /// Right sibling on the same tree level
    pub next_id: PageId,
}

impl PageHeader {
    /// Header of a fresh page with no siblings
    pub fn new(id: PageId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            previous_id: PageId::INVALID,
            next_id: PageId::INVALID,
        }
    }

    /// Read a page header from bytes
    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PAGE_HEADER_SIZE {
            return Err(StorageError::corruption(format!(
                "page buffer of {} bytes is shorter than its header",
                bytes.len()
            )));
        }

        let id = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let kind = NodeKind::from_byte(bytes[4]).ok_or_else(|| {
            StorageError::corruption(format!("unknown node kind {:#04x}", bytes[4]))
        })?;
        let previous_id = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
        let next_id = u32::from_be_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]);

        Ok(Self {
            id: PageId::new(id),
            kind,
            previous_id: PageId::new(previous_id),
            next_id: PageId::new(next_id),
        })
    }

    /// Append this header to `buf`
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.id.value().to_be_bytes());
        buf.push(self.kind as u8);
        buf.extend_from_slice(&self.previous_id.value().to_be_bytes());
        buf.extend_from_slice(&self.next_id.value().to_be_bytes());
    }
}
