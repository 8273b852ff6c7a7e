//! pagemeta Test Utilities
//!
//! Centralized test infrastructure for the pagemeta workspace:
//! - Mock description sources (fixed-value and failing)
//! - Re-exports of the mock store and core types

// Re-export mock stores from their source crate
pub use pagemeta_storage::{FailingPagePropsStore, MockPagePropsStore, WriteOp};

// Re-export core types for convenience
pub use pagemeta_core::{
    normalize_description, PageId, PageProperty, PagemetaError, PagemetaResult, PropertyName,
    SourceError, StorageError, DESCRIPTION_PROP,
};

use pagemeta_update::DescriptionSource;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Install a test tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// MOCK SOURCES
// ============================================================================

/// Description source returning a fixed value.
///
/// Records how it was called so tests can assert the clean flag made it
/// through and the source was consulted exactly once per run.
#[derive(Debug, Default)]
pub struct MockDescriptionSource {
    value: Option<String>,
    calls: AtomicU64,
    last_clean: AtomicBool,
}

impl MockDescriptionSource {
    /// Source that always returns the given description.
    pub fn returning(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Source that runs successfully but finds no description.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// The clean flag passed on the most recent fetch.
    pub fn last_clean(&self) -> bool {
        self.last_clean.load(Ordering::SeqCst)
    }
}

impl DescriptionSource for MockDescriptionSource {
    fn description(&self, _page: PageId, clean: bool) -> Result<Option<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_clean.store(clean, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

/// Description source that always fails.
#[derive(Debug)]
pub struct FailingDescriptionSource {
    error: SourceError,
}

impl FailingDescriptionSource {
    /// Source failing with the given error on every fetch.
    pub fn with(error: SourceError) -> Self {
        Self { error }
    }

    /// Source failing as if the extraction dependency is not installed.
    pub fn dependency_missing() -> Self {
        Self::with(SourceError::DependencyMissing {
            dependency: "description extractor".to_string(),
        })
    }
}

impl DescriptionSource for FailingDescriptionSource {
    fn description(&self, _page: PageId, _clean: bool) -> Result<Option<String>, SourceError> {
        Err(self.error.clone())
    }
}
