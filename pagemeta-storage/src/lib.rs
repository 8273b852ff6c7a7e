//! pagemeta Storage - Store Trait and Mock Implementation
//!
//! Defines the page-property store abstraction consumed by the description
//! reconciler. Production implementations wrap the host CMS's database
//! layer; this crate ships an in-memory mock with a write-operation journal
//! for tests.

use pagemeta_core::{PageId, PageProperty, PagemetaError, PagemetaResult, StorageError};
use std::sync::{Arc, RwLock};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Store for page-property rows.
///
/// Methods map one-to-one onto primitive single-statement operations against
/// the host's page-properties table. No transaction is held across calls;
/// safety under concurrent writers is the implementation's concern.
pub trait PagePropsStore: Send + Sync {
    /// Read all rows for `(page, name)`. Zero, one, or more rows; more than
    /// one means the at-most-one invariant has been violated upstream.
    fn get_properties(&self, page: PageId, name: &str) -> PagemetaResult<Vec<PageProperty>>;

    /// Insert a new row.
    fn insert(&self, row: &PageProperty) -> PagemetaResult<()>;

    /// Update the value column of the row matching `(page, name)`, leaving
    /// all other columns untouched.
    fn update(&self, page: PageId, name: &str, value: &str) -> PagemetaResult<()>;

    /// Delete every row matching `(page, name)`.
    fn delete(&self, page: PageId, name: &str) -> PagemetaResult<()>;
}

// ============================================================================
// WRITE JOURNAL
// ============================================================================

/// A single write statement issued against the store.
///
/// The mock records these in order so tests can assert exactly which writes
/// an operation produced (or that none were).
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Insert(PageProperty),
    Update {
        page: PageId,
        name: String,
        value: String,
    },
    Delete {
        page: PageId,
        name: String,
    },
}

// ============================================================================
// MOCK STORE
// ============================================================================

/// In-memory mock store for testing.
///
/// Rows live in a plain vector, so duplicate `(page, name)` keys can be
/// seeded to model the invariant violation the reconciler repairs.
#[derive(Debug, Default)]
pub struct MockPagePropsStore {
    rows: Arc<RwLock<Vec<PageProperty>>>,
    journal: Arc<RwLock<Vec<WriteOp>>>,
}

impl MockPagePropsStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store pre-seeded with rows.
    pub fn with_rows(rows: Vec<PageProperty>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            journal: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed a row without recording a journal entry.
    pub fn seed(&self, row: PageProperty) {
        self.rows.write().unwrap().push(row);
    }

    /// All rows currently stored.
    pub fn rows(&self) -> Vec<PageProperty> {
        self.rows.read().unwrap().clone()
    }

    /// Count of stored rows.
    pub fn row_count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// The ordered journal of write statements issued so far.
    pub fn journal(&self) -> Vec<WriteOp> {
        self.journal.read().unwrap().clone()
    }

    /// Count of journaled write statements.
    pub fn write_count(&self) -> usize {
        self.journal.read().unwrap().len()
    }

    /// Clear rows and journal.
    pub fn clear(&self) {
        self.rows.write().unwrap().clear();
        self.journal.write().unwrap().clear();
    }
}

impl PagePropsStore for MockPagePropsStore {
    fn get_properties(&self, page: PageId, name: &str) -> PagemetaResult<Vec<PageProperty>> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.page == page && r.name == name)
            .cloned()
            .collect())
    }

    fn insert(&self, row: &PageProperty) -> PagemetaResult<()> {
        self.rows.write().unwrap().push(row.clone());
        self.journal
            .write()
            .unwrap()
            .push(WriteOp::Insert(row.clone()));
        Ok(())
    }

    fn update(&self, page: PageId, name: &str, value: &str) -> PagemetaResult<()> {
        let mut rows = self.rows.write().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.page == page && r.name == name)
            .ok_or(PagemetaError::Storage(StorageError::UpdateFailed {
                page,
                reason: "no matching row".to_string(),
            }))?;
        row.value = value.to_string();

        self.journal.write().unwrap().push(WriteOp::Update {
            page,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn delete(&self, page: PageId, name: &str) -> PagemetaResult<()> {
        self.rows
            .write()
            .unwrap()
            .retain(|r| !(r.page == page && r.name == name));
        self.journal.write().unwrap().push(WriteOp::Delete {
            page,
            name: name.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// FAILING STORE
// ============================================================================

/// Store whose writes always fail.
///
/// Reads delegate to an inner mock so the reconciler reaches its write step;
/// used to verify that write errors propagate to the runner instead of being
/// swallowed.
#[derive(Debug, Default)]
pub struct FailingPagePropsStore {
    inner: MockPagePropsStore,
}

impl FailingPagePropsStore {
    /// Create a failing store with no existing rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a failing store whose reads see the given rows.
    pub fn with_rows(rows: Vec<PageProperty>) -> Self {
        Self {
            inner: MockPagePropsStore::with_rows(rows),
        }
    }
}

impl PagePropsStore for FailingPagePropsStore {
    fn get_properties(&self, page: PageId, name: &str) -> PagemetaResult<Vec<PageProperty>> {
        self.inner.get_properties(page, name)
    }

    fn insert(&self, row: &PageProperty) -> PagemetaResult<()> {
        Err(PagemetaError::Storage(StorageError::InsertFailed {
            page: row.page,
            reason: "write refused".to_string(),
        }))
    }

    fn update(&self, page: PageId, _name: &str, _value: &str) -> PagemetaResult<()> {
        Err(PagemetaError::Storage(StorageError::UpdateFailed {
            page,
            reason: "write refused".to_string(),
        }))
    }

    fn delete(&self, page: PageId, _name: &str) -> PagemetaResult<()> {
        Err(PagemetaError::Storage(StorageError::DeleteFailed {
            page,
            reason: "write refused".to_string(),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
