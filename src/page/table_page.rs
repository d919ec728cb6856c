//! Sorted, size-bounded page of encoded records for one table.

use std::cmp::Ordering;
use std::sync::Arc;

use log::trace;

use crate::error::{Mutation, Result, StorageError};
use crate::page::search::{scan, Scan};
use crate::page::slotted::{count_size, slot_size};
use crate::page::{PageData, PageHeader};
use crate::schema::{Codec, Record, Table};
use crate::types::{NodeKind, PageConfig, PageId};

/// Outcome of [`Page::find_key`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKey<'a> {
    /// A record with an equal key sits at `index`
    Found { index: usize, record: &'a [u8] },
    /// No equal key. `last_less` is the index of the last record whose key
    /// is smaller than the probe, `None` if the probe precedes every record.
    NotFound { last_less: Option<usize> },
}

impl FindKey<'_> {
    /// Slot a record with the probed key occupies or would be inserted at
    pub fn insertion_index(&self) -> usize {
        match *self {
            Self::Found { index, .. } => index,
            Self::NotFound { last_less } => last_less.map_or(0, |i| i + 1),
        }
    }
}

/// Mutable view of one page's records, kept sorted by key.
///
/// `byte_size` always equals the length `dump()` would produce (for a page
/// that was loaded, the length of the buffer it was loaded from) and never
/// exceeds the table's maximum page size after a successful mutation.
#[derive(Debug, Clone)]
pub struct Page {
    key: Arc<Codec>,
    record: Arc<Codec>,
    config: PageConfig,
    data: PageData,
    byte_size: usize,
}

impl Page {
    /// Create an empty leaf page
    pub fn new(table: &Table, id: PageId) -> Self {
        Self::new_with_kind(table, id, NodeKind::Leaf)
    }

    /// Create an empty page of the given kind
    pub fn new_with_kind(table: &Table, id: PageId, kind: NodeKind) -> Self {
        let data = PageData::new(PageHeader::new(id, kind));
        let byte_size = data.encoded_size();
        trace!("new {:?} page {} for {} ({} bytes)", kind, id, table.name(), byte_size);
        Self::from_parts(table, data, byte_size)
    }

    /// Load a page from a buffer produced by [`Page::dump`].
    ///
    /// The byte size is taken from the buffer's length rather than
    /// recomputed, so it matches the page's physical footprint.
    pub fn load(table: &Table, bytes: &[u8]) -> Result<Self> {
        let data = PageData::from_bytes(bytes)?;
        trace!(
            "loaded page {} for {}: {} records, {} bytes",
            data.header().id,
            table.name(),
            data.records().len(),
            bytes.len()
        );
        Ok(Self::from_parts(table, data, bytes.len()))
    }

    fn from_parts(table: &Table, data: PageData, byte_size: usize) -> Self {
        Self {
            key: Arc::clone(table.key_codec()),
            record: Arc::clone(table.record_codec()),
            config: table.config(),
            data,
            byte_size,
        }
    }

    /// Serialize the page
    pub fn dump(&self) -> Vec<u8> {
        self.data.to_bytes()
    }

    pub fn id(&self) -> PageId {
        self.data.header().id
    }

    pub fn kind(&self) -> NodeKind {
        self.data.header().kind
    }

    pub fn set_kind(&mut self, kind: NodeKind) {
        self.data.header_mut().kind = kind;
    }

    pub fn previous_id(&self) -> Option<PageId> {
        self.data.header().previous_id.into_option()
    }

    pub fn set_previous_id(&mut self, id: Option<PageId>) {
        self.data.header_mut().previous_id = PageId::from_option(id);
    }

    pub fn next_id(&self) -> Option<PageId> {
        self.data.header().next_id.into_option()
    }

    pub fn set_next_id(&mut self, id: Option<PageId>) {
        self.data.header_mut().next_id = PageId::from_option(id);
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        self.byte_size
    }

    /// Configured maximum serialized size
    pub fn max_size(&self) -> usize {
        self.config.max_page_size()
    }

    /// Bytes left before the page is full
    pub fn free_space(&self) -> usize {
        self.max_size().saturating_sub(self.byte_size)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.data.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.records().is_empty()
    }

    /// Encoded records in ascending key order
    pub fn records(&self) -> &[Vec<u8>] {
        self.data.records()
    }

    /// Decode every record. The result is a fresh copy.
    pub fn decode_records(&self) -> Result<Vec<Record>> {
        self.records().iter().map(|r| self.record.decode(r)).collect()
    }

    pub fn key_codec(&self) -> &Arc<Codec> {
        &self.key
    }

    pub fn record_codec(&self) -> &Arc<Codec> {
        &self.record
    }

    /// Locate `key_bytes` (an encoded key, header included).
    pub fn find_key(&self, key_bytes: &[u8]) -> Result<FindKey<'_>> {
        let probe = Codec::key_bytes(key_bytes)?;
        let records = self.records();

        let found = match scan(records, |r| self.compare_record_key(r, probe))? {
            Scan::Match(index) => FindKey::Found {
                index,
                record: &records[index],
            },
            Scan::Greater(index) => FindKey::NotFound {
                last_less: index.checked_sub(1),
            },
            Scan::Exhausted => FindKey::NotFound {
                last_less: records.len().checked_sub(1),
            },
        };
        Ok(found)
    }

    fn compare_record_key(&self, record: &[u8], probe: &[u8]) -> Result<Ordering> {
        self.key.compare(Codec::key_bytes(record)?, probe)
    }

    /// Encoded record stored under `key_bytes`
    pub fn get_bytes(&self, key_bytes: &[u8]) -> Result<Option<&[u8]>> {
        match self.find_key(key_bytes)? {
            FindKey::Found { record, .. } => Ok(Some(record)),
            FindKey::NotFound { .. } => Ok(None),
        }
    }

    /// Decoded record whose key fields match `key`
    pub fn get(&self, key: &Record) -> Result<Option<Record>> {
        let key_bytes = self.key.encode(key)?;
        self.get_bytes(&key_bytes)?
            .map(|bytes| self.record.decode(bytes))
            .transpose()
    }

    /// Insert or overwrite an encoded record.
    ///
    /// `record_bytes` must decode with the table's record codec, and
    /// `key_bytes` must carry the same key, otherwise the call fails
    /// ([`StorageError::Codec`] / [`StorageError::KeyBytesMismatch`]) and the
    /// page is left untouched.
    pub fn put_bytes(&mut self, key_bytes: &[u8], record_bytes: Vec<u8>) -> Result<()> {
        self.record.decode(&record_bytes)?;
        let probe = Codec::key_bytes(key_bytes)?;
        if self.compare_record_key(&record_bytes, probe)? != Ordering::Equal {
            return Err(StorageError::KeyBytesMismatch { page_id: self.id() });
        }

        let (index, old_len) = match self.find_key(key_bytes)? {
            FindKey::Found { index, record } => (index, Some(record.len())),
            not_found => (not_found.insertion_index(), None),
        };

        match old_len {
            Some(old_len) => self.update(index, record_bytes, old_len),
            None => self.insert(index, record_bytes),
        }
    }

    /// Encode and insert or overwrite a logical record
    pub fn put(&mut self, record: &Record) -> Result<()> {
        let key_bytes = self.key.encode(record)?;
        let record_bytes = self.record.encode(record)?;
        self.put_bytes(&key_bytes, record_bytes)
    }

    /// Remove the record stored under `key_bytes`.
    ///
    /// Returns whether a record was removed; an absent key is not an error.
    pub fn delete_bytes(&mut self, key_bytes: &[u8]) -> Result<bool> {
        let index = match self.find_key(key_bytes)? {
            FindKey::Found { index, .. } => index,
            FindKey::NotFound { .. } => return Ok(false),
        };

        let count = self.len();
        let removed = self.data.remove(index);
        self.byte_size -= slot_size(removed.len()) + count_size(count) - count_size(count - 1);
        trace!("page {}: deleted slot {}, {} bytes", self.id(), index, self.byte_size);
        Ok(true)
    }

    /// Remove the record whose key fields match `key`
    pub fn delete(&mut self, key: &Record) -> Result<bool> {
        let key_bytes = self.key.encode(key)?;
        self.delete_bytes(&key_bytes)
    }

    fn insert(&mut self, index: usize, record: Vec<u8>) -> Result<()> {
        let count = self.len();
        let projected =
            self.byte_size + slot_size(record.len()) + count_size(count + 1) - count_size(count);
        self.check_capacity(Mutation::Insert { index }, projected)?;

        self.data.insert(index, record);
        self.byte_size = projected;
        trace!("page {}: inserted slot {}, {} bytes", self.id(), index, projected);
        Ok(())
    }

    // Plain replacement of the slot; old and new buffers are not merged.
    fn update(&mut self, index: usize, record: Vec<u8>, old_len: usize) -> Result<()> {
        let projected = (self.byte_size + slot_size(record.len())).saturating_sub(slot_size(old_len));
        self.check_capacity(Mutation::Update { index }, projected)?;

        self.data.replace(index, record);
        self.byte_size = projected;
        trace!("page {}: updated slot {}, {} bytes", self.id(), index, projected);
        Ok(())
    }

    fn check_capacity(&self, op: Mutation, projected: usize) -> Result<()> {
        let max = self.max_size();
        if projected > max {
            return Err(StorageError::PageFull {
                page_id: self.id(),
                op,
                projected,
                max,
            });
        }
        Ok(())
    }
}
