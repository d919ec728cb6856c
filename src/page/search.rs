//! Ordered linear scan shared by pages and nodes.

use std::cmp::Ordering;

use crate::error::Result;

/// Where a probe key landed in an ordered run of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// Record at this index has an equal key
    Match(usize),
    /// Record at this index is the first with a greater key
    Greater(usize),
    /// Every record's key is smaller than the probe
    Exhausted,
}

/// Walk `records` in order, calling `cmp(record)` to compare each record's
/// key against the probe, and stop at the first equal or greater one.
pub(crate) fn scan<F>(records: &[Vec<u8>], mut cmp: F) -> Result<Scan>
where
    F: FnMut(&[u8]) -> Result<Ordering>,
{
    for (index, record) in records.iter().enumerate() {
        match cmp(record.as_slice())? {
            Ordering::Equal => return Ok(Scan::Match(index)),
            Ordering::Greater => return Ok(Scan::Greater(index)),
            Ordering::Less => {}
        }
    }
    Ok(Scan::Exhausted)
}
