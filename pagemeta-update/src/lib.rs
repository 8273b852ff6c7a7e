//! pagemeta Update - Description Reconciliation
//!
//! The deferred description update: after a page edit, fetch a candidate
//! description from the injected source and reconcile it against the
//! page-property store (insert, update, repair duplicates, or leave alone).
//!
//! # Architecture
//!
//! - [`DescriptionSource`]: trait for the collaborator producing candidate
//!   description strings.
//! - [`DeferredDescriptionUpdate`]: one reconciliation run for one page.
//! - [`UpdateRunner`]: host-side queue that executes updates after the
//!   triggering request completes, owning the logging and metrics policy.
//!
//! Each run is terminal: `Fetch -> Normalize -> Decide -> one of
//! {Insert, Update, Delete+Insert, NoOp}`, with no retries.

pub mod reconcile;
pub mod runner;
pub mod source;

pub use reconcile::{DeferredDescriptionUpdate, SkipReason, UpdateOutcome};
pub use runner::{
    DeferredUpdate, RunnerConfig, RunnerMetrics, RunnerSnapshot, UpdateRunner,
};
pub use source::DescriptionSource;
