//! Page layer: slotted storage of schema-encoded records.
//!
//! A page is a fixed header followed by an ordered array of opaque record
//! buffers:
//! - [`PageHeader`] holds the id, node kind and sibling links
//! - [`PageData`] is the serializable header + records pair
//! - [`Page`] keeps records sorted by key and tracks the exact serialized
//!   size against the table's maximum

mod header;
pub(crate) mod search;
mod slotted;
mod table_page;

pub use header::PageHeader;
pub use slotted::{count_size, slot_size, PageData};
pub use table_page::{FindKey, Page};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Mutation, Result, StorageError};
    use crate::schema::{Field, FieldType, Record, Schema, Table, RECORD_HEADER_SIZE};
    use crate::types::{NodeKind, PageConfig, PageId, EMPTY_PAGE_SIZE};

    fn table(max_page_size: usize) -> Table {
        Table::new(
            "items",
            Schema::new("item_key", vec![Field::new("id", FieldType::Int)]),
            Schema::new(
                "item",
                vec![
                    Field::new("id", FieldType::Int),
                    Field::new("body", FieldType::String),
                ],
            ),
            PageConfig::new(max_page_size),
        )
        .unwrap()
    }

    fn item(id: i32, body: &str) -> Record {
        Record::new().with("id", id).with("body", body)
    }

    fn key(id: i32) -> Record {
        Record::new().with("id", id)
    }

    fn key_bytes(page: &Page, id: i32) -> Vec<u8> {
        page.key_codec().encode(&key(id)).unwrap()
    }

    fn ids(page: &Page) -> Vec<i32> {
        page.decode_records()
            .unwrap()
            .iter()
            .map(|r| match r.get("id") {
                Some(crate::schema::Value::Int(id)) => *id,
                other => panic!("unexpected id {:?}", other),
            })
            .collect()
    }

    // Encoded item with a one-byte id (|id| < 64) and a body of `body_len`
    // ASCII bytes is RECORD_HEADER_SIZE + 1 + 1 + body_len long.
    fn body_for_len(encoded_len: usize) -> String {
        "x".repeat(encoded_len - RECORD_HEADER_SIZE - 2)
    }

    #[test]
    fn test_new_page() {
        let table = table(4096);
        let page = Page::new(&table, PageId::new(1));
        assert_eq!(page.id(), PageId::new(1));
        assert_eq!(page.kind(), NodeKind::Leaf);
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);
        assert_eq!(page.dump().len(), page.size());
        assert!(page.is_empty());
        assert_eq!(page.previous_id(), None);
        assert_eq!(page.next_id(), None);
    }

    #[test]
    fn test_find_key_positions() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        for id in [5, 1, 3] {
            page.put(&item(id, "v"))?;
        }
        assert_eq!(ids(&page), vec![1, 3, 5]);

        match page.find_key(&key_bytes(&page, 3))? {
            FindKey::Found { index, record } => {
                assert_eq!(index, 1);
                assert_eq!(record, page.records()[1].as_slice());
            }
            other => panic!("expected Found, got {:?}", other),
        }
        assert_eq!(
            page.find_key(&key_bytes(&page, 2))?,
            FindKey::NotFound { last_less: Some(0) }
        );
        assert_eq!(
            page.find_key(&key_bytes(&page, 0))?,
            FindKey::NotFound { last_less: None }
        );
        assert_eq!(
            page.find_key(&key_bytes(&page, 9))?,
            FindKey::NotFound { last_less: Some(2) }
        );
        assert_eq!(page.find_key(&key_bytes(&page, 9))?.insertion_index(), 3);
        assert_eq!(page.find_key(&key_bytes(&page, 0))?.insertion_index(), 0);
        Ok(())
    }

    #[test]
    fn test_get_put_overwrite() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, "one"))?;
        page.put(&item(2, "two"))?;
        page.put(&item(1, "uno"))?;

        assert_eq!(page.len(), 2);
        assert_eq!(page.get(&key(1))?, Some(item(1, "uno")));
        assert_eq!(page.get(&key(2))?, Some(item(2, "two")));
        assert_eq!(page.get(&key(3))?, None);
        assert_eq!(page.size(), page.dump().len());
        Ok(())
    }

    #[test]
    fn test_get_bytes_returns_raw_record() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(4, "four"))?;

        let expected = table.record_codec().encode(&item(4, "four"))?;
        assert_eq!(page.get_bytes(&key_bytes(&page, 4))?, Some(expected.as_slice()));
        assert_eq!(page.get_bytes(&key_bytes(&page, 5))?, None);
        Ok(())
    }

    #[test]
    fn test_insert_size_delta() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        let record = table.record_codec().encode(&item(1, &body_for_len(40)))?;
        assert_eq!(record.len(), 40);

        page.put(&item(1, &body_for_len(40)))?;
        // slot (len + 1) plus the record count appearing
        assert_eq!(page.size(), EMPTY_PAGE_SIZE + 41 + 1);

        page.put(&item(2, &body_for_len(40)))?;
        assert_eq!(page.size(), EMPTY_PAGE_SIZE + 2 * 41 + 1);
        assert_eq!(page.size(), page.dump().len());
        Ok(())
    }

    #[test]
    fn test_delete_size_delta() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, &body_for_len(20)))?;
        page.put(&item(2, &body_for_len(30)))?;

        assert!(page.delete(&key(2))?);
        assert_eq!(page.size(), EMPTY_PAGE_SIZE + 21 + 1);

        assert!(page.delete(&key(1))?);
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);
        assert_eq!(page.dump().len(), EMPTY_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn test_delete_absent_is_noop() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, "a"))?;
        let before = (page.records().to_vec(), page.size());

        assert!(!page.delete(&key(7))?);
        assert_eq!((page.records().to_vec(), page.size()), before);

        let mut empty = Page::new(&table, PageId::new(2));
        assert!(!empty.delete(&key(1))?);
        assert_eq!(empty.size(), EMPTY_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn test_record_count_varint_growth() -> Result<()> {
        let table = table(1 << 16);
        let mut page = Page::new(&table, PageId::new(1));
        for id in 0..130 {
            page.put(&item(id, ""))?;
            assert_eq!(page.size(), page.dump().len(), "after insert {}", id);
        }
        for id in (0..130).rev() {
            page.delete(&key(id))?;
            assert_eq!(page.size(), page.dump().len(), "after delete {}", id);
        }
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn test_long_record_length_prefix() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, &"y".repeat(500)))?;
        assert_eq!(page.size(), page.dump().len());
        page.put(&item(1, "short"))?;
        assert_eq!(page.size(), page.dump().len());
        Ok(())
    }

    #[test]
    fn test_page_full_on_insert_leaves_page_unchanged() -> Result<()> {
        let table = table(64);
        let mut page = Page::new(&table, PageId::new(1));
        // 14 empty + 1 count + 3 * 11 = 48; a fourth 11-byte slot would be 59,
        // a fifth 70.
        let mut id = 0;
        loop {
            let before = (page.records().to_vec(), page.size());
            match page.put(&item(id, &body_for_len(10))) {
                Ok(()) => id += 1,
                Err(StorageError::PageFull {
                    page_id,
                    op,
                    projected,
                    max,
                }) => {
                    assert_eq!(page_id, PageId::new(1));
                    assert_eq!(op, Mutation::Insert { index: id as usize });
                    assert_eq!(max, 64);
                    assert!(projected > 64);
                    assert_eq!((page.records().to_vec(), page.size()), before);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        assert_eq!(id, 4);
        assert_eq!(page.size(), 59);
        assert_eq!(page.size(), page.dump().len());
        Ok(())
    }

    #[test]
    fn test_update_shrink_then_grow_room() -> Result<()> {
        let table = table(64);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, &body_for_len(40)))?;
        let before = page.size();

        // 56 + 11 would exceed 64
        let err = page.put(&item(2, &body_for_len(10))).unwrap_err();
        assert!(err.is_page_full());

        page.put(&item(1, &body_for_len(10)))?;
        assert_eq!(before - page.size(), 30);

        page.put(&item(2, &body_for_len(10)))?;
        assert_eq!(page.len(), 2);
        assert_eq!(page.size(), page.dump().len());
        Ok(())
    }

    #[test]
    fn test_update_overflow_rejected() -> Result<()> {
        let table = table(64);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, &body_for_len(10)))?;
        let before = (page.records().to_vec(), page.size());

        match page.put(&item(1, &body_for_len(60))) {
            Err(StorageError::PageFull { op, .. }) => {
                assert_eq!(op, Mutation::Update { index: 0 })
            }
            other => panic!("expected PageFull, got {:?}", other),
        }
        assert_eq!((page.records().to_vec(), page.size()), before);
        Ok(())
    }

    #[test]
    fn test_put_bytes_key_mismatch() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        let record = table.record_codec().encode(&item(1, "a"))?;

        let err = page.put_bytes(&key_bytes(&page, 2), record.clone()).unwrap_err();
        assert!(matches!(err, StorageError::KeyBytesMismatch { page_id } if page_id == PageId::new(1)));
        assert!(page.is_empty());
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);

        page.put_bytes(&key_bytes(&page, 1), record)?;
        assert_eq!(page.len(), 1);
        Ok(())
    }

    #[test]
    fn test_put_bytes_rejects_foreign_encoding() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, "a"))?;
        let before = (page.records().to_vec(), page.size());

        // A key-only buffer carries the key schema's fingerprint
        let key = key_bytes(&page, 2);
        let err = page.put_bytes(&key, key.clone()).unwrap_err();
        assert!(matches!(err, StorageError::Codec(_)));

        // Right header, truncated body
        let mut record = table.record_codec().encode(&item(2, "bb"))?;
        record.pop();
        let err = page.put_bytes(&key, record).unwrap_err();
        assert!(matches!(err, StorageError::Codec(_)));

        assert_eq!((page.records().to_vec(), page.size()), before);
        assert_eq!(page.decode_records()?, vec![item(1, "a")]);
        Ok(())
    }

    #[test]
    fn test_clamped_json_limit_holds_for_fresh_page() -> Result<()> {
        let table = Table::from_json(
            r#"{
                "name": "tiny",
                "key": {"name": "k", "fields": [{"name": "id", "type": "int"}]},
                "record": {"name": "r", "fields": [{"name": "id", "type": "int"}]},
                "page": {"maxPageSize": 1}
            }"#,
        )?;
        let mut page = Page::new(&table, PageId::new(1));
        assert_eq!(page.max_size(), EMPTY_PAGE_SIZE);
        assert!(page.size() <= page.max_size());
        assert_eq!(page.free_space(), 0);

        assert!(page.put(&key(1)).unwrap_err().is_page_full());
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn test_with_config_and_free_space() -> Result<()> {
        let table = table(4096).with_config(PageConfig::new(64));
        let mut page = Page::new(&table, PageId::new(1));
        assert_eq!(page.max_size(), 64);
        assert_eq!(page.free_space(), 64 - EMPTY_PAGE_SIZE);

        page.put(&item(1, &body_for_len(10)))?;
        assert_eq!(page.free_space(), 64 - page.size());
        assert_eq!(page.free_space(), 64 - 26);
        Ok(())
    }

    #[test]
    fn test_load_dump_roundtrip() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new_with_kind(&table, PageId::new(7), NodeKind::Internal);
        page.set_previous_id(Some(PageId::new(6)));
        page.set_next_id(Some(PageId::new(8)));
        for id in [3, 1, 2] {
            page.put(&item(id, "payload"))?;
        }

        let bytes = page.dump();
        let loaded = Page::load(&table, &bytes)?;
        assert_eq!(loaded.id(), page.id());
        assert_eq!(loaded.kind(), NodeKind::Internal);
        assert_eq!(loaded.previous_id(), Some(PageId::new(6)));
        assert_eq!(loaded.next_id(), Some(PageId::new(8)));
        assert_eq!(loaded.records(), page.records());
        assert_eq!(loaded.size(), page.size());
        assert_eq!(loaded.dump(), bytes);
        Ok(())
    }

    #[test]
    fn test_load_trusts_buffer_length() -> Result<()> {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.put(&item(1, "a"))?;

        let mut padded = page.dump();
        padded.resize(100, 0);
        let loaded = Page::load(&table, &padded)?;
        assert_eq!(loaded.size(), 100);
        assert_eq!(loaded.records(), page.records());
        Ok(())
    }

    #[test]
    fn test_header_setters_do_not_change_size() {
        let table = table(4096);
        let mut page = Page::new(&table, PageId::new(1));
        page.set_kind(NodeKind::Internal);
        page.set_next_id(Some(PageId::new(2)));
        assert_eq!(page.size(), EMPTY_PAGE_SIZE);
        assert_eq!(page.dump().len(), EMPTY_PAGE_SIZE);
        page.set_next_id(None);
        assert_eq!(page.next_id(), None);
    }
}
