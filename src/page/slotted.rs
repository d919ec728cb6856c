//! Slotted page storage: the serialized form of a page.
//!
//! Layout:
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │              Page Header (13 bytes)                 │
//! ├────────────────────────────────────────────────────┤
//! │  Record count (varint, omitted when empty)          │
//! ├────────────────────────────────────────────────────┤
//! │  [len][record0] [len][record1] ...                  │
//! ├────────────────────────────────────────────────────┤
//! │  Terminator (0x00)                                  │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! Records are kept in ascending key order by the page that owns them; this
//! type only stores and serializes them.

use crate::error::{Result, StorageError};
use crate::page::PageHeader;
use crate::types::{decode_varint, varint_size, write_varint, PAGE_HEADER_SIZE};

/// Bytes taken by one slot: its length prefix plus the record
pub fn slot_size(record_len: usize) -> usize {
    varint_size(record_len as u64) + record_len
}

/// Bytes taken by the record count of an array holding `count` records.
/// An empty array is just the terminator, so it has no count.
pub fn count_size(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        varint_size(count as u64)
    }
}

/// Header plus an ordered list of opaque encoded records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    header: PageHeader,
    records: Vec<Vec<u8>>,
}

impl PageData {
    /// Create page data with no records
    pub fn new(header: PageHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    pub fn header(&self) -> &PageHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut PageHeader {
        &mut self.header
    }

    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    pub fn insert(&mut self, index: usize, record: Vec<u8>) {
        self.records.insert(index, record);
    }

    /// Replace the record at `index`, returning the old one
    pub fn replace(&mut self, index: usize, record: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.records[index], record)
    }

    pub fn remove(&mut self, index: usize) -> Vec<u8> {
        self.records.remove(index)
    }

    /// Exact length of [`PageData::to_bytes`], computed without serializing
    pub fn encoded_size(&self) -> usize {
        let slots: usize = self.records.iter().map(|r| slot_size(r.len())).sum();
        PAGE_HEADER_SIZE + count_size(self.records.len()) + slots + 1
    }

    /// Serialize to a flat buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_size());
        self.header.write(&mut buf);

        if !self.records.is_empty() {
            write_varint(self.records.len() as u64, &mut buf);
            for record in &self.records {
                write_varint(record.len() as u64, &mut buf);
                buf.extend_from_slice(record);
            }
        }
        buf.push(0);

        buf
    }

    /// Deserialize from a buffer produced by [`PageData::to_bytes`].
    ///
    /// Bytes after the terminator are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = PageHeader::read(bytes)?;
        let mut offset = PAGE_HEADER_SIZE;

        let (count, n) = decode_varint(&bytes[offset..])
            .ok_or_else(|| StorageError::corruption("failed to decode record count"))?;
        offset += n;

        let count = count as usize;
        let mut records = Vec::with_capacity(count.min(bytes.len() - offset));
        if count > 0 {
            for i in 0..count {
                let (len, n) = decode_varint(&bytes[offset..]).ok_or_else(|| {
                    StorageError::corruption(format!("failed to decode length of record {}", i))
                })?;
                offset += n;

                let len = len as usize;
                if len > bytes.len() - offset {
                    return Err(StorageError::corruption(format!(
                        "record {} overruns the page buffer",
                        i
                    )));
                }
                records.push(bytes[offset..offset + len].to_vec());
                offset += len;
            }

            match bytes.get(offset) {
                Some(0) => {}
                _ => return Err(StorageError::corruption("missing records terminator")),
            }
        }

        Ok(Self { header, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeKind, PageId, EMPTY_PAGE_SIZE};

    fn data(records: Vec<Vec<u8>>) -> PageData {
        let mut data = PageData::new(PageHeader::new(PageId::new(3), NodeKind::Leaf));
        for (i, r) in records.into_iter().enumerate() {
            data.insert(i, r);
        }
        data
    }

    #[test]
    fn test_empty_layout() -> Result<()> {
        let empty = data(vec![]);
        let bytes = empty.to_bytes();
        assert_eq!(bytes.len(), EMPTY_PAGE_SIZE);
        assert_eq!(empty.encoded_size(), EMPTY_PAGE_SIZE);
        assert_eq!(bytes[PAGE_HEADER_SIZE], 0);
        assert_eq!(PageData::from_bytes(&bytes)?, empty);
        Ok(())
    }

    #[test]
    fn test_roundtrip_is_byte_identical() -> Result<()> {
        let original = data(vec![b"a".to_vec(), Vec::new(), vec![7u8; 300], b"zz".to_vec()]);
        let bytes = original.to_bytes();
        assert_eq!(bytes.len(), original.encoded_size());

        let restored = PageData::from_bytes(&bytes)?;
        assert_eq!(restored, original);
        assert_eq!(restored.to_bytes(), bytes);
        Ok(())
    }

    #[test]
    fn test_small_record_costs_len_plus_one() {
        let one = data(vec![vec![1u8; 40]]);
        // count byte + length byte + payload
        assert_eq!(one.encoded_size(), EMPTY_PAGE_SIZE + 1 + 41);
        assert_eq!(slot_size(127), 128);
        assert_eq!(slot_size(128), 130);
    }

    #[test]
    fn test_truncated_buffers_are_corrupt() {
        let bytes = data(vec![b"hello".to_vec(), b"world".to_vec()]).to_bytes();
        for cut in [PAGE_HEADER_SIZE, PAGE_HEADER_SIZE + 3, bytes.len() - 1] {
            assert!(
                matches!(PageData::from_bytes(&bytes[..cut]), Err(StorageError::Corruption(_))),
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn test_replace_and_remove() {
        let mut d = data(vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(d.replace(1, b"c".to_vec()), b"b".to_vec());
        assert_eq!(d.remove(0), b"a".to_vec());
        assert_eq!(d.records(), &[b"c".to_vec()]);
    }
}
