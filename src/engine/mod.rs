pub mod entry;
pub mod entry_store;
pub mod summary;

pub use entry::{ProductTally, RepresentativeEntry};
pub use entry_store::{EntryStore, Snapshot};
pub use summary::render_summary;
