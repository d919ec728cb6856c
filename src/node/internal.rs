//! Internal node: separator records that route a descent.

use crate::error::Result;
use crate::page::Page;
use crate::schema::Record;
use crate::types::NodeKind;

use super::{expect_kind, FindResult, Node};

/// Read-only internal view over a page
#[derive(Debug, Clone, Copy)]
pub struct InternalNode<'a> {
    page: &'a Page,
}

impl<'a> InternalNode<'a> {
    /// Wrap an internal page; fails if the page is not internal
    pub fn new(page: &'a Page) -> Result<Self> {
        expect_kind(page, NodeKind::Internal)?;
        Ok(Self { page })
    }

    /// Slot whose subtree covers `key`.
    ///
    /// Slot `i` covers keys from its own separator up to the next one, so
    /// this is the exact match or the slot before the first greater
    /// separator. Keys below the first separator also go to slot 0.
    /// `None` when the node has no separators.
    pub fn child_slot(&self, key: &Record) -> Result<Option<usize>> {
        let slot = self.find(key)?.map(|found| match found {
            FindResult::ExactMatch { index, .. } => index,
            FindResult::FirstGreaterThan { index } => index.saturating_sub(1),
        });
        Ok(slot)
    }
}

impl Node for InternalNode<'_> {
    fn page(&self) -> &Page {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Schema, Table};
    use crate::types::{PageConfig, PageId};

    #[test]
    fn test_child_slot() -> Result<()> {
        let schema = Schema::new("sep", vec![Field::new("id", FieldType::Int)]);
        let table = Table::new("t", schema.clone(), schema, PageConfig::default())?;
        let mut page = Page::new_with_kind(&table, PageId::new(1), NodeKind::Internal);

        let empty = InternalNode::new(&page)?;
        assert_eq!(empty.child_slot(&Record::new().with("id", 1))?, None);

        for id in [10, 20, 30] {
            page.put(&Record::new().with("id", id))?;
        }
        let node = InternalNode::new(&page)?;
        let slot = |id: i32| node.child_slot(&Record::new().with("id", id));

        assert_eq!(slot(5)?, Some(0));
        assert_eq!(slot(10)?, Some(0));
        assert_eq!(slot(15)?, Some(0));
        assert_eq!(slot(20)?, Some(1));
        assert_eq!(slot(29)?, Some(1));
        assert_eq!(slot(30)?, Some(2));
        assert_eq!(slot(99)?, Some(2));
        Ok(())
    }
}
