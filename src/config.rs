//! Runtime configuration and on-disk layout.

use std::path::PathBuf;
use std::time::Duration;

/// Database file name within the data directory.
const DB_FILE: &str = "MasterListDB.sqlite";

/// Co-located document read by the auto-import on first start.
const AUTO_IMPORT_FILE: &str = "MasterListDB.json";

/// Default bound on the auto-import read, in milliseconds.
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the database and the auto-import document
    pub root: PathBuf,

    /// Upper bound on the auto-import read
    pub fetch_timeout: Duration,

    /// Auto-import even when a snapshot already exists
    pub overwrite: bool,
}

impl Config {
    /// Create config with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            overwrite: false,
        }
    }

    /// Default data directory: `<data_local_dir>/masterlist`, or `.` if unknown.
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("masterlist"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Get the database path.
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    /// Get the auto-import document path.
    pub fn auto_import_path(&self) -> PathBuf {
        self.root.join(AUTO_IMPORT_FILE)
    }

    /// Get the log directory.
    pub fn log_dir() -> PathBuf {
        Self::default_root().join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = Config::new("/tmp/ml");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/ml/MasterListDB.sqlite"));
        assert_eq!(config.auto_import_path(), PathBuf::from("/tmp/ml/MasterListDB.json"));
        assert!(!config.overwrite);
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_builders() {
        let config = Config::new(".")
            .with_overwrite(true)
            .with_fetch_timeout(Duration::from_millis(10));
        assert!(config.overwrite);
        assert_eq!(config.fetch_timeout, Duration::from_millis(10));
    }
}
