//! Startup sequence and the one-shot auto-import.
//!
//! On first start the data directory may hold a `MasterListDB.json` seed
//! document. It is imported only when nothing has been saved yet, unless the
//! overwrite override is set. Any failure is logged and otherwise ignored.

use crate::config::Config;
use crate::session::{Outcome, Session};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

/// What the auto-import did.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoImport {
    /// A snapshot already exists and no override was given.
    Skipped,
    /// This session already had its attempt.
    AlreadyAttempted,
    /// The document was imported; the outcome carries a warning if saving failed.
    Imported(Outcome),
    /// The document was missing, slow or invalid.
    Unavailable(String),
}

/// Everything startup produced.
pub struct Startup {
    pub session: Session,
    pub auto_import: AutoImport,
    pub loaded: Outcome,
}

/// Open storage, run the auto-import, then load the saved snapshot.
pub async fn start(config: &Config) -> Startup {
    start_with(Session::open(config), config).await
}

/// Run the startup sequence over an already opened session.
///
/// An auto-import whose save failed stays in memory rather than being
/// replaced by the older snapshot.
pub async fn start_with(mut session: Session, config: &Config) -> Startup {
    let auto_import = auto_import(&mut session, &config.auto_import_path(), config.overwrite, config.fetch_timeout).await;
    let loaded = match &auto_import {
        AutoImport::Imported(outcome) if outcome.warning.is_some() => session.keep_in_memory(outcome.warning.clone()),
        _ => session.load(),
    };

    Startup {
        session,
        auto_import,
        loaded,
    }
}

/// Seed the store from `source` if allowed. Runs at most once per session.
pub async fn auto_import(session: &mut Session, source: &Path, overwrite: bool, timeout: Duration) -> AutoImport {
    if !session.claim_auto_import() {
        return AutoImport::AlreadyAttempted;
    }

    if session.has_snapshot() && !overwrite {
        debug!("Auto-import skipped: snapshot already saved");
        return AutoImport::Skipped;
    }

    let raw = match tokio::time::timeout(timeout, tokio::fs::read(source)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            debug!("Auto-import source {} unreadable: {}", source.display(), e);
            return AutoImport::Unavailable(e.to_string());
        }
        Err(_) => {
            debug!("Auto-import source {} timed out", source.display());
            return AutoImport::Unavailable(format!("timed out after {:?}", timeout));
        }
    };

    match session.import_document(&raw) {
        Ok(outcome) => {
            info!("Auto-imported {} ({} categories)", source.display(), outcome.count.unwrap_or(0));
            AutoImport::Imported(outcome)
        }
        Err(e) => {
            debug!("Auto-import of {} rejected: {}", source.display(), e);
            AutoImport::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    fn seed(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("MasterListDB.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_imports_when_empty() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, r#"{"categories": [["Fruits", "Apple"]]}"#);
        let mut session = Session::new(Box::new(MemoryStorage::new()));

        let result = auto_import(&mut session, &path, false, Duration::from_secs(1)).await;
        assert!(matches!(result, AutoImport::Imported(ref o) if o.count == Some(1)));
        assert!(session.has_snapshot());
    }

    #[tokio::test]
    async fn test_runs_once() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, "[]");
        let mut session = Session::new(Box::new(MemoryStorage::new()));

        auto_import(&mut session, &path, false, Duration::from_secs(1)).await;
        let again = auto_import(&mut session, &path, true, Duration::from_secs(1)).await;
        assert_eq!(again, AutoImport::AlreadyAttempted);
    }

    #[tokio::test]
    async fn test_missing_source_is_silent() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new(Box::new(MemoryStorage::new()));

        let result = auto_import(&mut session, &dir.path().join("absent.json"), false, Duration::from_secs(1)).await;
        assert!(matches!(result, AutoImport::Unavailable(_)));
        assert!(!session.has_snapshot());
    }

    #[tokio::test]
    async fn test_invalid_source_is_silent() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, r#"{"categories": [[""]]}"#);
        let mut session = Session::new(Box::new(MemoryStorage::new()));

        let result = auto_import(&mut session, &path, false, Duration::from_secs(1)).await;
        assert!(matches!(result, AutoImport::Unavailable(_)));
        assert!(session.store().is_empty());
    }
}
