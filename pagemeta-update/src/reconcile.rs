//! Deferred description update
//!
//! Reconciles the fetched description against the stored one. The decision
//! table, in precedence order:
//!
//! 1. more than one existing row: delete them all, insert fresh (repair)
//! 2. zero rows: insert
//! 3. one row, identical value: no-op
//! 4. one row, different value: update the value column in place

use crate::source::DescriptionSource;
use pagemeta_core::{
    normalize_description, PageId, PageProperty, PagemetaResult, DESCRIPTION_PROP,
};
use pagemeta_storage::PagePropsStore;
use std::sync::Arc;
use tracing::debug;

/// Why a run finished without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The description source failed; the update is abandoned silently.
    SourceFailed,
    /// The source produced nothing usable (empty or placeholder text).
    NoDescription,
}

/// Terminal outcome of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No row existed; one was inserted.
    Inserted,
    /// One row existed with a different value; it was updated in place.
    Updated,
    /// Duplicate rows existed; all were deleted and one was inserted.
    Replaced,
    /// The stored value already matched; nothing was written.
    Unchanged,
    /// The run aborted before the decision step; nothing was written.
    Skipped(SkipReason),
}

/// A deferred update to the description property of one page.
///
/// Scheduled by the host after a page edit, typically when revision data
/// updates fire. We set the property manually since no parser output is
/// available in a deferred context.
pub struct DeferredDescriptionUpdate {
    page: PageId,
    clean: bool,
    source: Arc<dyn DescriptionSource>,
    store: Arc<dyn PagePropsStore>,
}

impl DeferredDescriptionUpdate {
    /// Create an update for the given page.
    ///
    /// `clean` controls whether the fetched description is cut at sentence
    /// boundaries.
    pub fn new(
        page: PageId,
        clean: bool,
        source: Arc<dyn DescriptionSource>,
        store: Arc<dyn PagePropsStore>,
    ) -> Self {
        Self {
            page,
            clean,
            source,
            store,
        }
    }

    /// The page this update targets.
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Run the reconciliation.
    ///
    /// Source failures are not surfaced: the run ends as
    /// [`UpdateOutcome::Skipped`] with the store untouched, and the worst
    /// user-visible effect is a stale description. Store errors propagate
    /// to the caller (the runner), which owns the logging policy.
    pub fn run(&self) -> PagemetaResult<UpdateOutcome> {
        let raw = match self.source.description(self.page, self.clean) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(page = %self.page, error = %err, "description fetch failed, skipping");
                return Ok(UpdateOutcome::Skipped(SkipReason::SourceFailed));
            }
        };

        let description = match normalize_description(raw.as_deref()) {
            Some(d) => d,
            None => return Ok(UpdateOutcome::Skipped(SkipReason::NoDescription)),
        };

        let existing = self.store.get_properties(self.page, DESCRIPTION_PROP)?;

        match existing.as_slice() {
            [] => {
                self.store
                    .insert(&PageProperty::description(self.page, &description))?;
                Ok(UpdateOutcome::Inserted)
            }
            [current] => {
                // Byte-for-byte comparison; anything else updates.
                if current.value == description {
                    return Ok(UpdateOutcome::Unchanged);
                }
                self.store
                    .update(self.page, DESCRIPTION_PROP, &description)?;
                Ok(UpdateOutcome::Updated)
            }
            _ => {
                // Multiple description rows should not occur. Repair by
                // deleting them all, which then requires a fresh insert.
                self.store.delete(self.page, DESCRIPTION_PROP)?;
                self.store
                    .insert(&PageProperty::description(self.page, &description))?;
                Ok(UpdateOutcome::Replaced)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemeta_core::SourceError;
    use pagemeta_storage::MockPagePropsStore;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedSource(Option<String>);

    impl DescriptionSource for FixedSource {
        fn description(&self, _page: PageId, _clean: bool) -> Result<Option<String>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct CleanFlagProbe(AtomicBool);

    impl DescriptionSource for CleanFlagProbe {
        fn description(&self, _page: PageId, clean: bool) -> Result<Option<String>, SourceError> {
            self.0.store(clean, Ordering::SeqCst);
            Ok(Some("Probe.".to_string()))
        }
    }

    #[test]
    fn test_clean_flag_reaches_source() {
        let probe = Arc::new(CleanFlagProbe(AtomicBool::new(false)));
        let store = Arc::new(MockPagePropsStore::new());
        let update =
            DeferredDescriptionUpdate::new(PageId::new(1), true, probe.clone(), store);

        update.run().unwrap();
        assert!(probe.0.load(Ordering::SeqCst));
    }

    #[test]
    fn test_source_none_skips_with_no_description() {
        let store = Arc::new(MockPagePropsStore::new());
        let update = DeferredDescriptionUpdate::new(
            PageId::new(1),
            false,
            Arc::new(FixedSource(None)),
            store.clone(),
        );

        let outcome = update.run().unwrap();
        assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::NoDescription));
        assert_eq!(store.write_count(), 0);
    }
}
