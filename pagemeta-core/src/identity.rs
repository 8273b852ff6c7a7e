//! Identity types for pagemeta entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a content page in the host CMS.
///
/// Opaque to this crate: the host assigns it, we only use it as the row key
/// for page-property reads and writes. Maps to the relational page reference
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(i64);

impl PageId {
    /// Wrap a host-assigned page id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw id, as stored in the page reference column.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier for a queued deferred update, using UUIDv7 for
/// timestamp-sortable IDs.
pub type UpdateId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 UpdateId (timestamp-sortable).
pub fn new_update_id() -> UpdateId {
    Uuid::now_v7()
}
