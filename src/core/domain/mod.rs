//! Domain types.

mod diff;
mod secret;
mod summary;
mod sync;

pub use diff::Diff;
pub use secret::{Secret, Secrets};
pub use summary::{ChangeSummary, NamespaceChanges};
pub use sync::SyncReport;
