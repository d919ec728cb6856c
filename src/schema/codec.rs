//! Binary record codec.
//!
//! Encoded layout:
//! ```text
//! Offset  Size  Description
//! 0       2     Magic bytes 0xC3 0x01
//! 2       4     Schema fingerprint (CRC32, big-endian)
//! 6       ..    Fields in schema order
//! ```
//!
//! Field encodings: boolean as one byte, int/long as zig-zag varints,
//! double as 8 little-endian bytes, string/bytes as a varint length followed
//! by the raw bytes.

use std::cmp::Ordering;

use crate::error::{Result, StorageError};
use crate::types::{decode_varint, write_varint, zigzag_decode, zigzag_encode};

use super::{Field, FieldType, Record, Schema, Value};

/// Size of the header preceding the encoded fields
pub const RECORD_HEADER_SIZE: usize = 6;

const MAGIC: [u8; 2] = [0xC3, 0x01];

/// Encoder, decoder and byte-level comparator for one schema
#[derive(Debug, Clone)]
pub struct Codec {
    schema: Schema,
    fingerprint: u32,
}

impl Codec {
    pub fn new(schema: Schema) -> Self {
        let fingerprint = schema.fingerprint();
        Self {
            schema,
            fingerprint,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Encode the schema's fields of `record`, header included.
    ///
    /// Extra fields in the record are ignored; missing ones are an error.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + self.schema.fields.len() * 8);
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&self.fingerprint.to_be_bytes());

        for field in &self.schema.fields {
            let value = record.get(&field.name).ok_or_else(|| {
                StorageError::codec(format!(
                    "record is missing field '{}' of {}",
                    field.name, self.schema.name
                ))
            })?;
            encode_value(field, value, &mut buf)?;
        }

        Ok(buf)
    }

    /// Decode a buffer produced by [`Codec::encode`] with the same schema.
    pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
        let body = Self::key_bytes(bytes)?;
        if bytes[..2] != MAGIC {
            return Err(StorageError::codec("bad record magic"));
        }
        let fingerprint = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        if fingerprint != self.fingerprint {
            return Err(StorageError::codec(format!(
                "fingerprint {:#010x} does not belong to schema {}",
                fingerprint, self.schema.name
            )));
        }

        let mut reader = Reader::new(body);
        let mut record = Record::new();
        for field in &self.schema.fields {
            let value = match field.field_type {
                FieldType::Boolean => Value::Boolean(reader.read_bool()?),
                FieldType::Int => {
                    let v = reader.read_long()?;
                    let v = i32::try_from(v).map_err(|_| {
                        StorageError::codec(format!("int field '{}' out of range", field.name))
                    })?;
                    Value::Int(v)
                }
                FieldType::Long => Value::Long(reader.read_long()?),
                FieldType::Double => Value::Double(reader.read_double()?),
                FieldType::String => {
                    let raw = reader.read_slice()?;
                    let s = std::str::from_utf8(raw).map_err(|_| {
                        StorageError::codec(format!("string field '{}' is not UTF-8", field.name))
                    })?;
                    Value::String(s.to_string())
                }
                FieldType::Bytes => Value::Bytes(reader.read_slice()?.to_vec()),
            };
            record.set(field.name.clone(), value);
        }

        if !reader.is_exhausted() {
            return Err(StorageError::codec(format!(
                "{} trailing bytes after {}",
                reader.remaining(),
                self.schema.name
            )));
        }

        Ok(record)
    }

    /// Compare two header-stripped encodings field by field.
    ///
    /// Only this codec's fields are read, so `b` may be a longer encoding
    /// (a full record) whose leading fields follow this schema.
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Result<Ordering> {
        let mut ra = Reader::new(a);
        let mut rb = Reader::new(b);

        for field in &self.schema.fields {
            let ord = match field.field_type {
                FieldType::Boolean => ra.read_bool()?.cmp(&rb.read_bool()?),
                FieldType::Int | FieldType::Long => ra.read_long()?.cmp(&rb.read_long()?),
                FieldType::Double => ra.read_double()?.total_cmp(&rb.read_double()?),
                FieldType::String | FieldType::Bytes => ra.read_slice()?.cmp(rb.read_slice()?),
            };
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }

        Ok(Ordering::Equal)
    }

    /// Compare two full encodings (headers included).
    pub fn compare_encoded(&self, a: &[u8], b: &[u8]) -> Result<Ordering> {
        self.compare(Self::key_bytes(a)?, Self::key_bytes(b)?)
    }

    /// Strip the record header, leaving the encoded fields.
    pub fn key_bytes(encoded: &[u8]) -> Result<&[u8]> {
        encoded.get(RECORD_HEADER_SIZE..).ok_or_else(|| {
            StorageError::codec(format!(
                "encoded record is {} bytes, shorter than its header",
                encoded.len()
            ))
        })
    }
}

fn encode_value(field: &Field, value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    match (field.field_type, value) {
        (FieldType::Boolean, Value::Boolean(v)) => buf.push(u8::from(*v)),
        (FieldType::Int, Value::Int(v)) => write_varint(zigzag_encode(*v as i64), buf),
        (FieldType::Long, Value::Int(v)) => write_varint(zigzag_encode(*v as i64), buf),
        (FieldType::Long, Value::Long(v)) => write_varint(zigzag_encode(*v), buf),
        (FieldType::Double, Value::Double(v)) => buf.extend_from_slice(&v.to_le_bytes()),
        (FieldType::String, Value::String(v)) => {
            write_varint(v.len() as u64, buf);
            buf.extend_from_slice(v.as_bytes());
        }
        (FieldType::Bytes, Value::Bytes(v)) => {
            write_varint(v.len() as u64, buf);
            buf.extend_from_slice(v);
        }
        (expected, value) => {
            return Err(StorageError::codec(format!(
                "field '{}' expects {}, got {}",
                field.name,
                expected.name(),
                value.field_type().name()
            )))
        }
    }
    Ok(())
}

/// Cursor over encoded fields
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(StorageError::codec(format!(
                "truncated field: need {} bytes, {} left",
                n,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_varint(&mut self) -> Result<u64> {
        let (value, n) = decode_varint(&self.bytes[self.pos..])
            .ok_or_else(|| StorageError::codec("invalid varint"))?;
        self.pos += n;
        Ok(value)
    }

    fn read_bool(&mut self) -> Result<bool> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(StorageError::codec(format!("invalid boolean byte {:#04x}", b))),
        }
    }

    fn read_long(&mut self) -> Result<i64> {
        Ok(zigzag_decode(self.read_varint()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        let raw = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(raw);
        Ok(f64::from_le_bytes(arr))
    }

    fn read_slice(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()? as usize;
        self.take(len)
    }
}
