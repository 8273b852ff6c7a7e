//! Error types for pagemeta operations

use crate::identity::PageId;
use thiserror::Error;

/// Description-source errors.
///
/// These are recovered locally by the reconciler: a failed fetch aborts the
/// update with no side effects and is never surfaced past the outcome value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Description source dependency missing: {dependency}")]
    DependencyMissing { dependency: String },

    #[error("Description extraction failed for page {page}: {reason}")]
    ExtractionFailed { page: PageId, reason: String },

    #[error("Page not found: {page}")]
    PageMissing { page: PageId },
}

/// Page-property store errors.
///
/// Write failures are not handled by the reconciler; they propagate to the
/// deferred-update runner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Property query failed for page {page}: {reason}")]
    QueryFailed { page: PageId, reason: String },

    #[error("Insert failed for page {page}: {reason}")]
    InsertFailed { page: PageId, reason: String },

    #[error("Update failed for page {page}: {reason}")]
    UpdateFailed { page: PageId, reason: String },

    #[error("Delete failed for page {page}: {reason}")]
    DeleteFailed { page: PageId, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Master error type for all pagemeta errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PagemetaError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for pagemeta operations.
pub type PagemetaResult<T> = Result<T, PagemetaError>;

// =============================================================================
// TESTS
// =============================================================================
