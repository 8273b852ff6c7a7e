//! Reconciliation behavior tests
//!
//! One test per observable store property: which writes a run issues, in
//! what order, against which rows.

use pagemeta_test_utils::{
    FailingDescriptionSource, MockDescriptionSource, MockPagePropsStore, PageId, PageProperty,
    SourceError, WriteOp, DESCRIPTION_PROP,
};
use pagemeta_update::{DeferredDescriptionUpdate, SkipReason, UpdateOutcome};
use std::sync::Arc;

fn page(n: i64) -> PageId {
    PageId::new(n)
}

fn run_update(
    p: PageId,
    source: impl pagemeta_update::DescriptionSource + 'static,
    store: Arc<MockPagePropsStore>,
) -> UpdateOutcome {
    DeferredDescriptionUpdate::new(p, false, Arc::new(source), store)
        .run()
        .unwrap()
}

#[test]
fn source_failure_leaves_store_unchanged() {
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "Existing."),
    ]));

    let outcome = run_update(
        page(1),
        FailingDescriptionSource::dependency_missing(),
        store.clone(),
    );

    assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::SourceFailed));
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.rows()[0].value, "Existing.");
}

#[test]
fn extraction_failure_is_not_surfaced() {
    let store = Arc::new(MockPagePropsStore::new());
    let source = FailingDescriptionSource::with(SourceError::ExtractionFailed {
        page: page(1),
        reason: "lead section unparsable".to_string(),
    });

    // run() returns Ok even though the source failed
    let outcome = run_update(page(1), source, store.clone());
    assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::SourceFailed));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn empty_and_placeholder_descriptions_write_nothing() {
    for candidate in ["", "   ", "\u{2026}", " \u{2026} ", "\\u2026"] {
        let store = Arc::new(MockPagePropsStore::new());
        let outcome = run_update(
            page(1),
            MockDescriptionSource::returning(candidate),
            store.clone(),
        );

        assert_eq!(
            outcome,
            UpdateOutcome::Skipped(SkipReason::NoDescription),
            "candidate {:?} should be treated as no description",
            candidate
        );
        assert_eq!(store.write_count(), 0);
    }
}

#[test]
fn zero_rows_inserts_exactly_one() {
    let store = Arc::new(MockPagePropsStore::new());

    let outcome = run_update(
        page(7),
        MockDescriptionSource::returning("Fresh description."),
        store.clone(),
    );

    assert_eq!(outcome, UpdateOutcome::Inserted);
    assert_eq!(
        store.journal(),
        vec![WriteOp::Insert(PageProperty::description(
            page(7),
            "Fresh description."
        ))]
    );
}

#[test]
fn identical_value_writes_nothing() {
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "Old"),
    ]));

    let outcome = run_update(page(1), MockDescriptionSource::returning("Old"), store.clone());

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn differing_value_updates_in_place() {
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "Old value."),
    ]));

    let outcome = run_update(
        page(1),
        MockDescriptionSource::returning("New value."),
        store.clone(),
    );

    assert_eq!(outcome, UpdateOutcome::Updated);
    assert_eq!(
        store.journal(),
        vec![WriteOp::Update {
            page: page(1),
            name: DESCRIPTION_PROP.to_string(),
            value: "New value.".to_string(),
        }]
    );
    assert_eq!(store.row_count(), 1);
}

#[test]
fn update_preserves_non_value_columns() {
    let mut row = PageProperty::description(page(1), "Old value.");
    row.sort_key = Some(2.0);
    let store = Arc::new(MockPagePropsStore::with_rows(vec![row]));

    run_update(
        page(1),
        MockDescriptionSource::returning("New value."),
        store.clone(),
    );

    let rows = store.rows();
    assert_eq!(rows[0].value, "New value.");
    assert_eq!(rows[0].sort_key, Some(2.0));
}

#[test]
fn duplicate_rows_are_deleted_then_one_inserted() {
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "first"),
        PageProperty::description(page(1), "second"),
        PageProperty::description(page(1), "third"),
    ]));

    let outcome = run_update(
        page(1),
        MockDescriptionSource::returning("Repaired."),
        store.clone(),
    );

    assert_eq!(outcome, UpdateOutcome::Replaced);
    assert_eq!(
        store.journal(),
        vec![
            WriteOp::Delete {
                page: page(1),
                name: DESCRIPTION_PROP.to_string(),
            },
            WriteOp::Insert(PageProperty::description(page(1), "Repaired.")),
        ]
    );
    assert_eq!(store.rows(), vec![PageProperty::description(page(1), "Repaired.")]);
}

#[test]
fn duplicate_rows_of_other_pages_are_untouched() {
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "a"),
        PageProperty::description(page(1), "b"),
        PageProperty::description(page(2), "other page"),
    ]));

    run_update(
        page(1),
        MockDescriptionSource::returning("Repaired."),
        store.clone(),
    );

    let other: Vec<_> = store
        .rows()
        .into_iter()
        .filter(|r| r.page == page(2))
        .collect();
    assert_eq!(other, vec![PageProperty::description(page(2), "other page")]);
}

#[test]
fn fetched_description_is_trimmed_before_insert() {
    let store = Arc::new(MockPagePropsStore::new());

    run_update(
        page(3),
        MockDescriptionSource::returning(" Example text. "),
        store.clone(),
    );

    assert_eq!(
        store.rows(),
        vec![PageProperty::description(page(3), "Example text.")]
    );
}

#[test]
fn fetched_description_is_trimmed_before_compare() {
    // A stored value equal to the trimmed candidate must count as unchanged.
    let store = Arc::new(MockPagePropsStore::with_rows(vec![
        PageProperty::description(page(1), "Old"),
    ]));

    let outcome = run_update(
        page(1),
        MockDescriptionSource::returning("  Old  "),
        store.clone(),
    );

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn source_is_consulted_exactly_once_per_run() {
    let source = Arc::new(MockDescriptionSource::returning("Text."));
    let store = Arc::new(MockPagePropsStore::new());
    let update = DeferredDescriptionUpdate::new(page(1), false, source.clone(), store);

    update.run().unwrap();
    assert_eq!(source.calls(), 1);
}

#[test]
fn store_write_errors_propagate() {
    use pagemeta_test_utils::{FailingPagePropsStore, PagemetaError, StorageError};

    let store = Arc::new(FailingPagePropsStore::new());
    let update = DeferredDescriptionUpdate::new(
        page(1),
        false,
        Arc::new(MockDescriptionSource::returning("Text.")),
        store,
    );

    let err = update.run().unwrap_err();
    assert!(matches!(
        err,
        PagemetaError::Storage(StorageError::InsertFailed { .. })
    ));
}
