//! MasterList: named categories holding ordered item lists.
//!
//! MasterList keeps a single ordered store of categories, saves a full
//! snapshot to a SQLite key-value table after every change, and moves data
//! in and out as portable JSON backups.
//!
//! # Example
//!
//! ```no_run
//! use masterlist::{Config, Session};
//!
//! let mut session = Session::open(&Config::new("."));
//! session.load();
//!
//! session.add_category("Fruits").unwrap();
//! session.add_item("Fruits", "Apple").unwrap();
//! session.add_item("Fruits", "Banana").unwrap();
//!
//! let removed = session.remove_item("Fruits", "Apple").unwrap();
//! assert_eq!(removed.count, Some(1));
//!
//! // Back up and start over
//! let backup = session.export_document();
//! std::fs::write(&backup.filename, &backup.contents).unwrap();
//! session.import_document(backup.contents.as_bytes()).unwrap();
//! ```

mod codec;
mod storage;
mod store;
mod tracker;
mod types;

pub mod bootstrap;
pub mod config;
pub mod report;
pub mod session;

// Re-export public API
pub use bootstrap::{AutoImport, Startup};
pub use codec::{export_filename, parse_document, validate};
pub use config::Config;
pub use session::{ExportedDocument, Outcome, Session};
pub use storage::{MemoryStorage, Persistence, SqliteStorage};
pub use store::{CategoryStore, ListError};
pub use tracker::{ExportStatus, ExportTracker};
pub use types::{Category, Payload, ValidationError, normalize};
