//! Variable-length integer encoding.
//!
//! Unsigned LEB128 varints are used for lengths and counts in the page
//! format; signed values go through zig-zag first so small negative numbers
//! stay short.

/// Encode a u64 as a variable-length integer.
///
/// Returns the encoded bytes. Uses LEB128-style encoding:
/// - Each byte uses 7 bits for data and 1 bit (MSB) as continuation flag
/// - MSB = 1 means more bytes follow
/// - MSB = 0 means this is the last byte
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(varint_size(value));
    write_varint(value, &mut buf);
    buf
}

/// Append the varint encoding of `value` to `buf`.
pub fn write_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80; // Set continuation bit
        }

        buf.push(byte);

        if value == 0 {
            break;
        }
    }
}

/// Decode a variable-length integer from a byte slice.
///
/// Returns the decoded value and the number of bytes consumed.
/// Returns `None` if the encoding is invalid or incomplete.
pub fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    if bytes.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= 10 {
            // Maximum 10 bytes for a 64-bit value with LEB128
            return None;
        }

        value |= ((byte & 0x7F) as u64) << shift;

        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }

        shift += 7;
        if shift > 63 {
            return None;
        }
    }

    // Incomplete varint
    None
}

/// Calculate the number of bytes needed to encode a value.
pub fn varint_size(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    (bits + 6) / 7
}

/// Map a signed integer onto an unsigned one so that values close to zero
/// get short encodings (0, -1, 1, -2, ... => 0, 1, 2, 3, ...).
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
