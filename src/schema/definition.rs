//! Schema definitions for keys and records.

use serde::{Deserialize, Serialize};

/// Primitive field types understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Int,
    Long,
    Double,
    String,
    Bytes,
}

impl FieldType {
    /// Name used in the canonical form and in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

/// A named, typed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// An ordered list of fields. Field order is encoding order and, for key
/// schemas, comparison priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Canonical textual form, e.g. `user{id:int,name:string}`
    pub fn canonical_form(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{}:{}", f.name, f.field_type.name()))
            .collect();
        format!("{}{{{}}}", self.name, fields.join(","))
    }

    /// CRC32 of the canonical form, stored in every encoded record header
    pub fn fingerprint(&self) -> u32 {
        crc32fast::hash(self.canonical_form().as_bytes())
    }

    /// Check whether this schema's fields are a leading prefix of `other`'s
    pub fn is_prefix_of(&self, other: &Schema) -> bool {
        self.fields.len() <= other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| a == b)
    }
}
