//! Session controller: owns the store, its persistence and the export tracker.
//!
//! Every mutation goes through here so that the name index, the saved
//! snapshot and the dirty flag always move together.

use crate::codec;
use crate::config::Config;
use crate::storage::{MemoryStorage, PAYLOAD_KEY, Persistence, SqliteStorage};
use crate::store::{CategoryStore, ListError};
use crate::tracker::{ExportStatus, ExportTracker};
use crate::types::Payload;
use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};

/// Result of a successful operation, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Short status line.
    pub message: String,
    /// Items or categories affected, for operations that count.
    pub count: Option<usize>,
    /// Persistence problem raised after the in-memory change succeeded.
    pub warning: Option<ListError>,
}

impl Outcome {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            count: None,
            warning: None,
        }
    }

    fn counted(message: impl Into<String>, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::new(message)
        }
    }

    fn with_warning(mut self, warning: Option<ListError>) -> Self {
        self.warning = warning;
        self
    }
}

/// An export ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub filename: String,
    /// Pretty-printed payload JSON.
    pub contents: String,
    pub revision: u64,
    pub categories: usize,
    pub warning: Option<ListError>,
}

impl ExportedDocument {
    pub fn message(&self) -> String {
        format!("Export started: {} ({} categories).", self.filename, self.categories)
    }
}

/// A running MasterList session.
pub struct Session {
    store: CategoryStore,
    storage: Box<dyn Persistence>,
    tracker: ExportTracker,
    auto_import_attempted: bool,
    startup_warning: Option<ListError>,
}

impl Session {
    /// Create a session over the given storage. The store starts empty; call [`Session::load`].
    pub fn new(storage: Box<dyn Persistence>) -> Self {
        let (tracker, startup_warning) = match ExportTracker::load(storage.as_ref()) {
            Ok(tracker) => (tracker, None),
            Err(e) => {
                warn!("Export tracker unavailable: {:#}", e);
                (ExportTracker::default(), Some(unavailable(e)))
            }
        };

        Self {
            store: CategoryStore::new(),
            storage,
            tracker,
            auto_import_attempted: false,
            startup_warning,
        }
    }

    /// Open the database named by `config`, degrading to memory-only storage if it cannot be opened.
    pub fn open(config: &Config) -> Self {
        let db_path = config.db_path();
        match SqliteStorage::open(&db_path) {
            Ok(storage) => Self::new(Box::new(storage)),
            Err(e) => {
                warn!("Storage unavailable at {}, changes will not be saved: {:#}", db_path.display(), e);
                let mut session = Self::new(Box::new(MemoryStorage::new()));
                session.startup_warning = Some(unavailable(e));
                session
            }
        }
    }

    /// Replace the in-memory store with the saved snapshot, if any.
    ///
    /// Loading is not a mutation: nothing is saved and the dirty flag is untouched.
    pub fn load(&mut self) -> Outcome {
        let (categories, warning) = match self.storage.load_categories() {
            Ok(Some(categories)) => (categories, None),
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                warn!("Failed to load snapshot: {:#}", e);
                (Vec::new(), Some(unavailable(e)))
            }
        };

        self.store.replace_all(categories);
        self.loaded_outcome(warning)
    }

    /// Keep the in-memory store as loaded state, e.g. when a seed import could not be saved.
    pub(crate) fn keep_in_memory(&self, warning: Option<ListError>) -> Outcome {
        warn!("Keeping unsaved in-memory store instead of the saved snapshot");
        self.loaded_outcome(warning)
    }

    fn loaded_outcome(&self, warning: Option<ListError>) -> Outcome {
        let mut message = format!("Data loaded (startup): {} categories.", self.store.len());
        if let Some(first) = self.store.categories().first() {
            message.push_str(&format!(" First: {}", first.name));
        }
        info!("{}", message);

        Outcome::counted(message, self.store.len()).with_warning(warning)
    }

    /// Whether a snapshot is currently saved. Storage errors count as "no".
    pub fn has_snapshot(&self) -> bool {
        match self.storage.get(PAYLOAD_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                debug!("Snapshot check failed: {:#}", e);
                false
            }
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn tracker(&self) -> &ExportTracker {
        &self.tracker
    }

    /// Whether changes survive the process.
    pub fn is_durable(&self) -> bool {
        self.storage.is_durable()
    }

    /// Warning raised while opening storage, if any.
    pub fn startup_warning(&self) -> Option<&ListError> {
        self.startup_warning.as_ref()
    }

    pub fn export_status(&self) -> ExportStatus {
        self.tracker.status()
    }

    pub fn add_category(&mut self, name: &str) -> Result<Outcome, ListError> {
        let name = self.store.add_category(name)?;
        let warning = self.commit();
        Ok(Outcome::new(format!("Added: {}", name)).with_warning(warning))
    }

    /// Delete every category with this name. Not finding one is not an error.
    pub fn delete_category(&mut self, name: &str) -> Result<Outcome, ListError> {
        let removed = self.store.delete_category(name);
        if removed == 0 {
            return Ok(Outcome::counted(format!("No category named: {}", name.trim()), 0));
        }

        let warning = self.commit();
        Ok(Outcome::counted(format!("Deleted: {}", name.trim()), removed).with_warning(warning))
    }

    pub fn add_item(&mut self, category: &str, item: &str) -> Result<Outcome, ListError> {
        let item = self.store.add_item(category, item)?;
        let warning = self.commit();
        Ok(Outcome::new(format!("Added: {}", item)).with_warning(warning))
    }

    /// Remove every matching item. Zero matches is a successful outcome with a count of 0.
    pub fn remove_item(&mut self, category: &str, item: &str) -> Result<Outcome, ListError> {
        let removed = self.store.remove_item(category, item)?;
        if removed == 0 {
            return Ok(Outcome::counted(format!("Item not found: {}", item.trim()), 0));
        }

        let warning = self.commit();
        Ok(Outcome::counted(format!("Removed {} time(s): {}", removed, item.trim()), removed).with_warning(warning))
    }

    pub fn edit_item(&mut self, category: &str, old: &str, new: &str) -> Result<Outcome, ListError> {
        let new = self.store.edit_item(category, old, new)?;
        let warning = self.commit();
        Ok(Outcome::new(format!("Updated '{}' to '{}'.", old, new)).with_warning(warning))
    }

    pub fn clear_items(&mut self, category: &str) -> Result<Outcome, ListError> {
        let dropped = self.store.clear_items(category)?;
        let warning = self.commit();
        Ok(Outcome::counted(format!("All items deleted for: {}", category.trim()), dropped).with_warning(warning))
    }

    /// Replace the whole store from an import document. On any error the store is untouched.
    pub fn import_document(&mut self, raw: &[u8]) -> Result<Outcome, ListError> {
        let categories = codec::parse_document(raw)?;
        let count = categories.len();

        self.store.replace_all(categories);
        let warning = self.commit();
        info!("Imported {} categories", count);

        Ok(Outcome::counted(format!("Imported {} categories.", count), count).with_warning(warning))
    }

    /// Export the store and mark it clean.
    pub fn export_document(&mut self) -> ExportedDocument {
        let mut doc = self.prepare_export(Local::now());
        if let Some(warning) = self.finish_export(Utc::now()) {
            doc.warning.get_or_insert(warning);
        }
        doc
    }

    /// Build an export document, consuming the next revision.
    ///
    /// The dirty flag is left alone until [`Session::finish_export`].
    pub fn prepare_export(&mut self, now: DateTime<Local>) -> ExportedDocument {
        let payload = Payload::snapshot(self.store.categories());
        let contents = codec::render_pretty(&payload);

        let (revision, warning) = match self.tracker.next_export_revision(self.storage.as_mut()) {
            Ok(revision) => (revision, None),
            Err(e) => {
                warn!("{:#}", e);
                (self.tracker.next_local_revision(), Some(unavailable(e)))
            }
        };

        ExportedDocument {
            filename: codec::export_filename(now.naive_local(), revision),
            contents,
            revision,
            categories: self.store.len(),
            warning,
        }
    }

    /// Record that an export was delivered.
    pub fn finish_export(&mut self, now: DateTime<Utc>) -> Option<ListError> {
        self.tracker
            .mark_clean(now, self.storage.as_mut())
            .map_err(|e| {
                warn!("{:#}", e);
                unavailable(e)
            })
            .err()
    }

    /// Claim the one auto-import attempt this session gets.
    pub(crate) fn claim_auto_import(&mut self) -> bool {
        !std::mem::replace(&mut self.auto_import_attempted, true)
    }

    /// Save the full snapshot and mark the tracker dirty.
    ///
    /// Failures never undo the in-memory change; the first one is returned.
    fn commit(&mut self) -> Option<ListError> {
        let payload = Payload::snapshot(self.store.categories());
        let saved = self.storage.save_payload(&payload);
        let marked = self.tracker.mark_dirty(self.storage.as_mut());

        match saved.and(marked) {
            Ok(()) => None,
            Err(e) => {
                warn!("Save failed: {:#}", e);
                Some(unavailable(e))
            }
        }
    }
}

fn unavailable(e: eyre::Report) -> ListError {
    ListError::StorageUnavailable(format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::TimeZone;

    fn memory_session() -> Session {
        let mut session = Session::new(Box::new(MemoryStorage::new()));
        session.load();
        session
    }

    #[test]
    fn test_mutation_saves_and_marks_dirty() {
        let mut session = memory_session();
        assert!(!session.has_snapshot());
        assert!(!session.tracker().is_dirty());

        let outcome = session.add_category("Fruits").unwrap();
        assert_eq!(outcome.message, "Added: Fruits");
        assert!(outcome.warning.is_none());
        assert!(session.has_snapshot());
        assert!(session.tracker().is_dirty());
    }

    #[test]
    fn test_failed_operation_does_not_mark_dirty() {
        let mut session = memory_session();
        assert!(session.add_item("Nope", "x").is_err());
        assert!(!session.tracker().is_dirty());
        assert!(!session.has_snapshot());
    }

    #[test]
    fn test_zero_removals_not_saved() {
        let mut session = memory_session();
        session.add_category("Fruits").unwrap();
        session.finish_export(Utc::now());

        let outcome = session.remove_item("Fruits", "Mango").unwrap();
        assert_eq!(outcome.count, Some(0));
        assert!(!session.tracker().is_dirty());
    }

    #[test]
    fn test_load_reads_snapshot() {
        let mut storage = MemoryStorage::new();
        storage
            .save_payload(&Payload::snapshot(&[Category::with_items("A", ["x"])]))
            .unwrap();

        let mut session = Session::new(Box::new(storage));
        let outcome = session.load();
        assert_eq!(outcome.count, Some(1));
        assert_eq!(outcome.message, "Data loaded (startup): 1 categories. First: A");
        assert_eq!(session.store().find_category("A"), Some(0));
        assert!(!session.tracker().is_dirty());
    }

    #[test]
    fn test_prepare_export_filename_and_clean() {
        let mut session = memory_session();
        session.add_category("A").unwrap();

        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let doc = session.prepare_export(now);
        assert_eq!(doc.filename, "MasterListDB_2025-01-02_03-04_v1.json");
        assert_eq!(doc.categories, 1);
        assert!(session.tracker().is_dirty());

        assert!(session.finish_export(Utc::now()).is_none());
        assert!(!session.tracker().is_dirty());
        assert!(matches!(session.export_status(), ExportStatus::UpToDate { .. }));
    }

    #[test]
    fn test_claim_auto_import_once() {
        let mut session = memory_session();
        assert!(session.claim_auto_import());
        assert!(!session.claim_auto_import());
    }
}
