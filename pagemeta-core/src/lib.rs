//! pagemeta Core - Entity Types
//!
//! Pure data structures with no behavior beyond description normalization.
//! All other crates depend on this. This crate contains ONLY data types,
//! errors, and the normalization helper - no orchestration logic.

pub mod error;
pub mod identity;
pub mod normalize;
pub mod props;

pub use error::{PagemetaError, PagemetaResult, SourceError, StorageError};
pub use identity::{new_update_id, PageId, Timestamp, UpdateId};
pub use normalize::normalize_description;
pub use props::{PageProperty, PropertyName, DESCRIPTION_PROP};
