//! Leaf node: holds full records and the sibling chain.

use crate::error::Result;
use crate::page::Page;
use crate::schema::Record;
use crate::types::{NodeKind, PageId};

use super::{expect_kind, Node};

/// Mutable leaf view over a page
#[derive(Debug)]
pub struct LeafNode<'a> {
    page: &'a mut Page,
}

impl<'a> LeafNode<'a> {
    /// Wrap a leaf page; fails if the page is not a leaf
    pub fn new(page: &'a mut Page) -> Result<Self> {
        expect_kind(page, NodeKind::Leaf)?;
        Ok(Self { page })
    }

    pub fn get(&self, key: &Record) -> Result<Option<Record>> {
        self.page.get(key)
    }

    /// Insert or overwrite; a full page surfaces as `PageFull`
    pub fn put(&mut self, record: &Record) -> Result<()> {
        self.page.put(record)
    }

    pub fn delete(&mut self, key: &Record) -> Result<bool> {
        self.page.delete(key)
    }

    /// Point this leaf at its neighbours on the leaf level
    pub fn link(&mut self, previous: Option<PageId>, next: Option<PageId>) {
        self.page.set_previous_id(previous);
        self.page.set_next_id(next);
    }
}

impl Node for LeafNode<'_> {
    fn page(&self) -> &Page {
        &*self.page
    }
}
