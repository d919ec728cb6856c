//! Page identifier type.

use std::fmt;

/// Identifier of a page, fixed when the page is created.
///
/// `u32::MAX` is reserved as the "no page" sentinel used by the sibling
/// links in the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageId(pub u32);

impl PageId {
    /// Invalid page ID, used as a sentinel value
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new page ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw page ID value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Check if this is a valid page ID
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Turn the sentinel into `None`.
    pub fn into_option(self) -> Option<PageId> {
        self.is_valid().then_some(self)
    }

    /// Inverse of [`PageId::into_option`].
    pub fn from_option(id: Option<PageId>) -> PageId {
        id.unwrap_or(Self::INVALID)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "INVALID")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PageId> for u32 {
    fn from(id: PageId) -> Self {
        id.0
    }
}
