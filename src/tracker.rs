//! Export reminder state: dirty flag, last export time and the revision counter.

use crate::storage::{DIRTY_SINCE_EXPORT_KEY, EXPORT_COUNTER_KEY, LAST_EXPORT_AT_KEY, Persistence};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use eyre::{Context, Result};

/// Whether an export is recommended, derived from the last export time and the dirty flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// No export has ever happened on this device.
    NeverExported { dirty: bool },
    /// Exported at the given time and unchanged since.
    UpToDate { at: DateTime<Utc> },
    /// Exported at the given time but changed since.
    Stale { at: DateTime<Utc> },
}

impl ExportStatus {
    pub fn recommends_export(&self) -> bool {
        matches!(
            self,
            ExportStatus::NeverExported { dirty: true } | ExportStatus::Stale { .. }
        )
    }
}

impl std::fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportStatus::NeverExported { dirty: true } => write!(f, "Export recommended (no prior export)."),
            ExportStatus::NeverExported { dirty: false } => write!(f, "Last export: (none yet)."),
            ExportStatus::UpToDate { at } => write!(f, "Last export: {}.", local_time(at)),
            ExportStatus::Stale { at } => {
                write!(f, "Last export: {}, export recommended.", local_time(at))
            }
        }
    }
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Per-device export bookkeeping, independent of the store contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTracker {
    dirty: bool,
    last_export_at: Option<DateTime<Utc>>,
    last_revision: u64,
}

impl ExportTracker {
    /// Read tracker state from storage. Missing or unreadable values fall back to defaults.
    pub fn load(storage: &dyn Persistence) -> Result<Self> {
        let dirty = storage
            .get(DIRTY_SINCE_EXPORT_KEY)
            .context("Failed to read dirty flag")?
            .is_some_and(|v| v == "1");

        let last_export_at = storage
            .get(LAST_EXPORT_AT_KEY)
            .context("Failed to read last export time")?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let last_revision = storage
            .get(EXPORT_COUNTER_KEY)
            .context("Failed to read export counter")?
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            dirty,
            last_export_at,
            last_revision,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_export_at(&self) -> Option<DateTime<Utc>> {
        self.last_export_at
    }

    /// Most recent revision handed out.
    pub fn last_revision(&self) -> u64 {
        self.last_revision
    }

    /// Record that the store changed since the last export.
    ///
    /// The in-memory flag is set even if the write fails.
    pub fn mark_dirty(&mut self, storage: &mut dyn Persistence) -> Result<()> {
        self.dirty = true;
        storage
            .put(DIRTY_SINCE_EXPORT_KEY, "1")
            .context("Failed to persist dirty flag")
    }

    /// Record a completed export at `now`.
    pub fn mark_clean(&mut self, now: DateTime<Utc>, storage: &mut dyn Persistence) -> Result<()> {
        self.dirty = false;
        self.last_export_at = Some(now);
        storage
            .put(DIRTY_SINCE_EXPORT_KEY, "0")
            .context("Failed to persist dirty flag")?;
        storage
            .put(LAST_EXPORT_AT_KEY, &now.to_rfc3339_opts(SecondsFormat::Millis, true))
            .context("Failed to persist last export time")
    }

    /// Hand out the next export revision from the persisted counter.
    ///
    /// Never returns a value at or below one already handed out in this session.
    pub fn next_export_revision(&mut self, storage: &mut dyn Persistence) -> Result<u64> {
        let persisted = storage
            .increment(EXPORT_COUNTER_KEY)
            .context("Failed to advance export counter")?;
        self.last_revision = persisted.max(self.last_revision + 1);
        if self.last_revision > persisted {
            storage
                .put(EXPORT_COUNTER_KEY, &self.last_revision.to_string())
                .context("Failed to catch up export counter")?;
        }
        Ok(self.last_revision)
    }

    /// Hand out the next revision without touching storage.
    pub fn next_local_revision(&mut self) -> u64 {
        self.last_revision += 1;
        self.last_revision
    }

    pub fn status(&self) -> ExportStatus {
        match (self.last_export_at, self.dirty) {
            (None, dirty) => ExportStatus::NeverExported { dirty },
            (Some(at), false) => ExportStatus::UpToDate { at },
            (Some(at), true) => ExportStatus::Stale { at },
        }
    }
}
