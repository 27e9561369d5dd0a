//! CLI argument parsing for MasterList.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ml",
    about = "Keep named categories of items, with JSON backups",
    version,
    after_help = "Logs are written to: ~/.local/share/masterlist/logs/masterlist.log"
)]
pub struct Cli {
    /// Data directory (default: ~/.local/share/masterlist)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Auto-import MasterListDB.json even if data is already saved
    #[arg(long, global = true)]
    pub overwrite: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new, empty category
    AddCategory {
        /// Category name
        name: String,
    },

    /// Delete a category (every entry with that name)
    DeleteCategory {
        /// Category name
        name: String,
    },

    /// Append an item to a category
    AddItem {
        /// Category name
        category: String,

        /// Item text
        item: String,
    },

    /// Remove every occurrence of an item from a category
    RemoveItem {
        /// Category name
        category: String,

        /// Item text
        item: String,
    },

    /// Replace the first occurrence of an item
    EditItem {
        /// Category name
        category: String,

        /// Current item text (exact)
        old: String,

        /// New item text
        new: String,
    },

    /// Delete all items in a category, keeping the category
    ClearItems {
        /// Category name
        category: String,
    },

    /// List category names
    Categories,

    /// Show all categories, or the items of one
    Show {
        /// Category name
        category: Option<String>,
    },

    /// Replace everything with the contents of a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },

    /// Write a JSON backup
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Show storage and export status
    Status,
}
