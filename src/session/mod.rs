use std::sync::Arc;

use crate::catalog::Catalog;
use crate::clipboard::Clipboard;
use crate::clock::Clock;
use crate::engine::entry_store::{EntryStore, Snapshot};
use crate::engine::summary::render_summary;

/// Editing keeps entries mutable; Displaying holds the summary frozen at the
/// moment it was rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Editing,
    Displaying { summary: String },
}

/// One day's logging session: the entry store plus the display state machine.
pub struct Session {
    store: EntryStore,
    mode: SessionMode,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, clock: Box<dyn Clock>) -> Self {
        Self {
            store: EntryStore::new(catalog),
            mode: SessionMode::Editing,
            clock,
        }
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn is_displaying(&self) -> bool {
        matches!(self.mode, SessionMode::Displaying { .. })
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Mutable access to the entries, only while editing.
    pub fn editor(&mut self) -> Option<&mut EntryStore> {
        match self.mode {
            SessionMode::Editing => Some(&mut self.store),
            SessionMode::Displaying { .. } => None,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.mode {
            SessionMode::Displaying { summary } => Some(summary),
            SessionMode::Editing => None,
        }
    }

    /// Render and freeze the summary. Calling it again while displaying keeps
    /// the text from the first render.
    pub fn display(&mut self) -> &str {
        if let SessionMode::Editing = self.mode {
            let today = self.clock.current_date();
            let summary = render_summary(self.store.snapshot().iter(), today);
            tracing::info!(
                entries = self.store.len(),
                lines = summary.lines().count(),
                "summary rendered"
            );
            self.mode = SessionMode::Displaying { summary };
        }
        self.summary().unwrap_or_default()
    }

    pub fn back(&mut self) {
        self.mode = SessionMode::Editing;
    }

    /// Clears every entry and drops any frozen summary, from either mode.
    pub fn reset_all(&mut self) {
        self.store.reset_all();
        self.mode = SessionMode::Editing;
        tracing::info!("session reset");
    }

    pub fn copy_summary(&self, clipboard: &mut dyn Clipboard) -> bool {
        match self.summary() {
            Some(text) => clipboard.copy_text(text),
            None => false,
        }
    }
}
