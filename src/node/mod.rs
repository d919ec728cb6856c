//! Tree node views over pages.
//!
//! A node adds tree semantics on top of a [`Page`]: its kind, its sibling
//! links and the ordered search used while descending the tree. Nodes own
//! nothing; they borrow the page they describe.
//!
//! - [`Node`]: accessors and `find`, shared by both variants
//! - [`LeafNode`]: full records, mutable
//! - [`InternalNode`]: separator keys, read-only child selection

mod internal;
mod leaf;

pub use internal::InternalNode;
pub use leaf::LeafNode;

use crate::error::{Result, StorageError};
use crate::page::search::{scan, Scan};
use crate::page::Page;
use crate::schema::{Codec, Record};
use crate::types::{NodeKind, PageId};

/// Outcome of [`Node::find`] on a non-empty node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindResult<'a> {
    /// The record at `index` has exactly the searched key
    ExactMatch { index: usize, record: &'a [u8] },
    /// `index` is the first record whose key is greater than the searched
    /// key, or the record count when there is none
    FirstGreaterThan { index: usize },
}

impl FindResult<'_> {
    pub fn index(&self) -> usize {
        match *self {
            Self::ExactMatch { index, .. } | Self::FirstGreaterThan { index } => index,
        }
    }
}

/// Tree-level view of a page
pub trait Node {
    /// The wrapped page
    fn page(&self) -> &Page;

    fn id(&self) -> PageId {
        self.page().id()
    }

    fn kind(&self) -> NodeKind {
        self.page().kind()
    }

    fn previous_id(&self) -> Option<PageId> {
        self.page().previous_id()
    }

    fn next_id(&self) -> Option<PageId> {
        self.page().next_id()
    }

    /// Serialized size of the page in bytes
    fn size(&self) -> usize {
        self.page().size()
    }

    fn records(&self) -> &[Vec<u8>] {
        self.page().records()
    }

    /// Record with the smallest key, `None` when the node is empty
    fn min_record(&self) -> Option<&[u8]> {
        self.records().first().map(Vec::as_slice)
    }

    fn decode_min_record(&self) -> Result<Option<Record>> {
        self.min_record()
            .map(|bytes| self.page().record_codec().decode(bytes))
            .transpose()
    }

    fn dump(&self) -> Vec<u8> {
        self.page().dump()
    }

    /// Search for a logical key. `Ok(None)` means the node is empty.
    fn find(&self, key: &Record) -> Result<Option<FindResult<'_>>> {
        let key_bytes = self.page().key_codec().encode(key)?;
        self.find_bytes(&key_bytes)
    }

    /// Search for an encoded key (header included).
    fn find_bytes(&self, key_bytes: &[u8]) -> Result<Option<FindResult<'_>>> {
        let page = self.page();
        let records = page.records();
        if records.is_empty() {
            return Ok(None);
        }

        let codec = page.key_codec();
        let probe = Codec::key_bytes(key_bytes)?;
        let result = match scan(records, |r| codec.compare(Codec::key_bytes(r)?, probe))? {
            Scan::Match(index) => FindResult::ExactMatch {
                index,
                record: &records[index],
            },
            Scan::Greater(index) => FindResult::FirstGreaterThan { index },
            Scan::Exhausted => FindResult::FirstGreaterThan {
                index: records.len(),
            },
        };
        Ok(Some(result))
    }
}

fn expect_kind(page: &Page, kind: NodeKind) -> Result<()> {
    if page.kind() != kind {
        return Err(StorageError::invalid_operation(format!(
            "page {} is {:?}, not {:?}",
            page.id(),
            page.kind(),
            kind
        )));
    }
    Ok(())
}
