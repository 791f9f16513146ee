//! # juno-core
//!
//! Core library for juno - a personal journal and media tracker.
//!
//! This library provides:
//! - Domain types for entries, daily slots, media items, ideas and captures
//! - A journal store over pluggable key-value storage (SQLite or memory)
//! - Smart-capture classification of freeform text
//! - Deterministic cover colors and glyphs for media items
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Addressing entries
//!
//! A date's entries live in one of two independent stores:
//! - **Daily slots:** six fixed positions (`morning_0` .. `evening_1`)
//! - **Timeline:** an append-only list without a size limit
//!
//! Writing one never changes the other.
//!
//! ## Example
//!
//! ```rust,no_run
//! use juno_core::{Config, Entry, Journal};
//!
//! let config = Config::load().expect("failed to load config");
//! let journal = Journal::open(&config).expect("failed to open journal");
//!
//! let today = chrono::Local::now().date_naive();
//! journal
//!     .append_timeline_entry(today, Entry::note("first entry").expect("valid note"))
//!     .expect("failed to save entry");
//!
//! let capture = journal
//!     .record_brain_dump("Reading: Atomic Habits\n- Build a journaling app")
//!     .expect("failed to record brain dump");
//! println!("extracted {} media items", capture.extracted_media.len());
//! ```

// Re-export commonly used items at the crate root
pub use capture::{Classifier, Extraction, LineClass, QuickCapture};
pub use config::Config;
pub use cover::{cover_for, Cover};
pub use error::{Error, Result};
pub use journal::{AsyncJournal, Journal, QuickCaptureOutcome};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::*;

// Public modules
pub mod capture;
pub mod config;
pub mod cover;
pub mod error;
pub mod journal;
pub mod logging;
pub mod store;
pub mod types;
