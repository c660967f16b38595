//! In-memory media library and its collections.
//!
//! # Ownership
//!
//! ```text
//! Library ── owns ──> Record (table keyed by id, title index on the side)
//! Catalog ── owns ──> Collection ── refers to ──> RecordId
//! ```
//!
//! Each record keeps a count of the collections that contain it, so a record
//! in use can be refused deletion without scanning the catalog.

pub mod catalog;
pub mod collection;
pub mod record;
pub mod store;

pub use catalog::{Catalog, CollectionStats};
pub use collection::Collection;
pub use record::{normalize_title, Record, RecordId, RecordList};
pub use store::{Library, LIBRARY_EMPTY};
