//! Description source trait

use pagemeta_core::{PageId, SourceError};

/// Collaborator producing a human-readable summary string for a page.
///
/// Implementations wrap whatever extraction machinery the host provides.
/// The dependency is injected at construction time; the reconciler never
/// looks it up itself.
pub trait DescriptionSource: Send + Sync {
    /// Fetch the candidate description for a page.
    ///
    /// `clean` requests truncation at sentence boundaries, so a dangling
    /// half-sentence is cut rather than kept. `Ok(None)` means the source
    /// ran but found nothing to say about the page.
    fn description(&self, page: PageId, clean: bool) -> Result<Option<String>, SourceError>;
}
