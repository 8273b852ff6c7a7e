//! Page-property row model
//!
//! A page property is a per-page key-value metadata entry stored by the host
//! CMS in a relational table: page reference, property name, value, and an
//! optional numeric sort key. The reconciler owns exactly one property name,
//! `description`.

use crate::identity::PageId;
use serde::{Deserialize, Serialize};

/// Property name key in the page-properties table.
pub type PropertyName = String;

/// Property name for the page description.
pub const DESCRIPTION_PROP: &str = "description";

/// A single page-property row.
///
/// System-wide invariant: at most one row per `(page, name)` pair. The
/// reconciler repairs violations opportunistically rather than assuming the
/// invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProperty {
    /// Page the property belongs to.
    pub page: PageId,
    /// Property name, e.g. `description`.
    pub name: PropertyName,
    /// Property value.
    pub value: String,
    /// Optional sort key; NULL for descriptions.
    pub sort_key: Option<f64>,
}

impl PageProperty {
    /// Create a property row with no sort key.
    pub fn new(page: PageId, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            page,
            name: name.into(),
            value: value.into(),
            sort_key: None,
        }
    }

    /// Create a description row for a page.
    pub fn description(page: PageId, value: impl Into<String>) -> Self {
        Self::new(page, DESCRIPTION_PROP, value)
    }
}
