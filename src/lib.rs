//! # B+Tree Page Layer
//!
//! The page and node layer of a disk-based B+Tree: variable-length,
//! schema-encoded records packed into size-bounded pages, kept in key order,
//! with exact byte accounting and a typed tree-node view on top.
//!
//! ## Architecture
//!
//! - **Schema Layer** (`schema`): key/record schemas, logical records and the
//!   binary codec that encodes them and compares encoded keys
//! - **Page Layer** (`page`): slotted page format, sorted get/put/delete and
//!   capacity enforcement
//! - **Node Layer** (`node`): leaf/internal views with sibling links and the
//!   ordered search used during descent
//!
//! Deciding when to split or merge, storing pages and concurrency control
//! belong to the layers above; a page only reports `PageFull`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bptree_pages::{Field, FieldType, Page, PageConfig, PageId, Record, Schema, Table};
//!
//! let table = Table::new(
//!     "users",
//!     Schema::new("user_key", vec![Field::new("id", FieldType::Long)]),
//!     Schema::new("user", vec![
//!         Field::new("id", FieldType::Long),
//!         Field::new("name", FieldType::String),
//!     ]),
//!     PageConfig::default(),
//! )?;
//!
//! let mut page = Page::new(&table, PageId::new(1));
//! page.put(&Record::new().with("id", 1i64).with("name", "ada"))?;
//!
//! let found = page.get(&Record::new().with("id", 1i64))?;
//!
//! // Persist and reload
//! let bytes = page.dump();
//! let page = Page::load(&table, &bytes)?;
//! ```

pub mod error;
pub mod node;
pub mod page;
pub mod schema;
pub mod types;

pub use error::{Mutation, Result, StorageError};
pub use node::{FindResult, InternalNode, LeafNode, Node};
pub use page::{FindKey, Page, PageData, PageHeader};
pub use schema::{Codec, Field, FieldType, Record, Schema, Table, TableDef, Value, RECORD_HEADER_SIZE};
pub use types::{NodeKind, PageConfig, PageId, EMPTY_PAGE_SIZE, PAGE_SIZE};
