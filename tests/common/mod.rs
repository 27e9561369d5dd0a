//! Shared test infrastructure for MasterList integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use masterlist::{Category, Config, Persistence, Session};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub session: Session,
}

impl TestEnv {
    /// Create a new test environment with an empty, loaded session.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = Session::open(&Config::new(temp_dir.path()));
        session.load();
        Self { temp_dir, session }
    }

    /// Create an environment whose store holds the given import document.
    pub fn with_document(json: &str) -> Self {
        let mut env = Self::new();
        env.session
            .import_document(json.as_bytes())
            .expect("Failed to import document");
        env
    }

    pub fn config(&self) -> Config {
        Config::new(self.temp_dir.path())
    }

    /// Simulate a restart: open a fresh session over the same directory.
    pub fn restart(&mut self) {
        let mut session = Session::open(&self.config());
        session.load();
        self.session = session;
    }

    /// Snapshot of the current store.
    pub fn categories(&self) -> Vec<Category> {
        self.session.store().categories().to_vec()
    }

    /// Items of a category.
    pub fn items(&self, name: &str) -> Vec<String> {
        self.session
            .store()
            .get(name)
            .unwrap_or_else(|| panic!("Category {} not found", name))
            .items
            .clone()
    }

    /// Assert that category names are unique.
    pub fn assert_unique_names(&self) {
        let mut names = self.session.store().names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "Duplicate category names: {:?}", self.categories());
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage whose writes always fail.
#[derive(Default)]
pub struct FailingStorage;

impl Persistence for FailingStorage {
    fn get(&self, _key: &str) -> eyre::Result<Option<String>> {
        Ok(None)
    }

    fn put(&mut self, key: &str, _value: &str) -> eyre::Result<()> {
        eyre::bail!("quota exceeded writing {}", key)
    }

    fn increment(&mut self, key: &str) -> eyre::Result<u64> {
        eyre::bail!("quota exceeded writing {}", key)
    }

    fn is_durable(&self) -> bool {
        true
    }
}
