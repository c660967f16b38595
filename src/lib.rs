//! mediacat - Interactive manager for a small media catalog
//!
//! Keeps a library of titled, rated media records and a catalog of named
//! collections over those records, and saves both to a flat text file.
//!
//! # Architecture
//!
//! - Records live in a single table keyed by id, with a title index on top
//! - Collections store record ids; each record counts the collections
//!   that hold it, so records in use cannot be deleted
//! - All state sits in an explicit [`Session`] passed to every command
//!
//! # Modules
//!
//! - `library`: Record, Library, Collection, Catalog
//! - `codec`: Save file format and the tokenizer it shares with the shell
//! - `session`: Library + Catalog context, save/restore
//! - `cli`: Command-line interface and interactive shell
//! - `config`: Path and shell settings
//!
//! # Usage
//!
//! ```bash
//! # Start the shell, loading a save file first
//! mediacat shell --restore library.txt
//!
//! # Validate a save file
//! mediacat check library.txt
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod library;
pub mod session;

// Re-export main types at crate root for convenience
pub use error::{ErrorKind, MediaError, MediaResult, RecoveryHint};
pub use library::{Catalog, Collection, CollectionStats, Library, Record, RecordId};
pub use session::{Allocations, Session};
