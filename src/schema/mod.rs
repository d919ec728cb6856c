//! Schema layer: field definitions, logical records and the binary codec
//! pages use to order and validate their contents.

mod codec;
mod definition;
mod value;

pub use codec::{Codec, RECORD_HEADER_SIZE};
pub use definition::{Field, FieldType, Schema};
pub use value::{Record, Value};

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::types::PageConfig;

/// JSON shape of a table definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDef {
    pub name: String,
    pub key: Schema,
    pub record: Schema,
    #[serde(default)]
    pub page: PageConfig,
}

/// A table: the key and record codecs plus the page limits.
///
/// Codecs sit behind `Arc` so every page of the table shares them.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    key: Arc<Codec>,
    record: Arc<Codec>,
    config: PageConfig,
}

impl Table {
    /// Build a table, checking that the key schema is a prefix of the
    /// record schema so key bytes can be read straight out of records.
    pub fn new(
        name: impl Into<String>,
        key: Schema,
        record: Schema,
        config: PageConfig,
    ) -> Result<Self> {
        let name = name.into();
        if key.fields.is_empty() {
            return Err(StorageError::schema(format!("table {} has an empty key", name)));
        }
        if !key.is_prefix_of(&record) {
            return Err(StorageError::schema(format!(
                "key {} is not a prefix of record {}",
                key.canonical_form(),
                record.canonical_form()
            )));
        }

        debug!(
            "table {}: key {}, record {}, max page size {}",
            name,
            key.canonical_form(),
            record.canonical_form(),
            config.max_page_size()
        );

        Ok(Self {
            name,
            key: Arc::new(Codec::new(key)),
            record: Arc::new(Codec::new(record)),
            config,
        })
    }

    /// Parse a [`TableDef`] from JSON and build the table.
    pub fn from_json(json: &str) -> Result<Self> {
        let def: TableDef = serde_json::from_str(json)?;
        Self::new(def.name, def.key, def.record, def.page)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_codec(&self) -> &Arc<Codec> {
        &self.key
    }

    pub fn record_codec(&self) -> &Arc<Codec> {
        &self.record
    }

    pub fn config(&self) -> PageConfig {
        self.config
    }

    /// Same table with a different page configuration
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }
}
