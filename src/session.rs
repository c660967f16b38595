//! A library and its catalog, kept together.
//!
//! Operations that touch both halves (membership changes, clears, save and
//! restore) go through here so the per-record membership counts are always
//! updated alongside the collections that imply them.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{info, warn};

use crate::codec;
use crate::error::{MediaError, MediaResult};
use crate::library::{Catalog, CollectionStats, Library, Record, RecordId};

/// Record and collection counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocations {
    pub records: usize,
    pub collections: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    library: Library,
    catalog: Catalog,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn add_record(&mut self, medium: &str, title: &str) -> MediaResult<RecordId> {
        self.library.add_record(medium, title)
    }

    pub fn set_rating(&mut self, id: RecordId, rating: i64) -> MediaResult<()> {
        self.library.find_record_by_id_mut(id)?.set_rating(rating)
    }

    pub fn modify_title(&mut self, id: RecordId, new_title: &str) -> MediaResult<()> {
        self.library.modify_title(id, new_title)
    }

    pub fn delete_record(&mut self, title: &str) -> MediaResult<Record> {
        self.library.delete_record(title)
    }

    pub fn add_collection(&mut self, name: &str) -> MediaResult<()> {
        self.catalog.add_collection(name)
    }

    /// Add record `id` to collection `name`; the collection is resolved first
    pub fn add_member(&mut self, name: &str, id: RecordId) -> MediaResult<&Record> {
        let collection = self.catalog.find_collection_mut(name)?;
        let record = self.library.find_record_by_id_mut(id)?;
        collection.add_member(record)?;
        Ok(&*record)
    }

    /// Remove record `id` from collection `name`; the collection is resolved first
    pub fn delete_member(&mut self, name: &str, id: RecordId) -> MediaResult<&Record> {
        let collection = self.catalog.find_collection_mut(name)?;
        let record = self.library.find_record_by_id_mut(id)?;
        collection.delete_member(record)?;
        Ok(&*record)
    }

    pub fn delete_collection(&mut self, name: &str) -> MediaResult<()> {
        self.catalog.delete_collection(name, &mut self.library)
    }

    pub fn combine_collections(&mut self, first: &str, second: &str, dst: &str) -> MediaResult<()> {
        self.catalog
            .combine_collections(first, second, dst, &mut self.library)
    }

    /// Delete all records; refused while any collection has members
    pub fn clear_library(&mut self) -> MediaResult<()> {
        self.library.clear(&self.catalog)
    }

    pub fn clear_catalog(&mut self) {
        self.catalog.clear(&mut self.library);
    }

    pub fn clear_all(&mut self) {
        self.library.clear_all(&mut self.catalog);
    }

    pub fn statistics(&self) -> CollectionStats {
        self.catalog.collection_statistics()
    }

    pub fn allocations(&self) -> Allocations {
        Allocations {
            records: self.library.num_records(),
            collections: self.catalog.num_collections(),
        }
    }

    /// Write the library and catalog to `path`, replacing any existing file
    pub fn save_all(&self, path: &Path) -> MediaResult<()> {
        let file = File::create(path).map_err(|source| MediaError::Unopenable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        codec::save(&self.library, &self.catalog, &mut writer)?;

        info!(
            path = %path.display(),
            records = self.library.num_records(),
            collections = self.catalog.num_collections(),
            "Data saved"
        );
        Ok(())
    }

    /// Replace the current state with the contents of `path`.
    ///
    /// On any failure the current state is left untouched.
    pub fn restore_all(&mut self, path: &Path) -> MediaResult<()> {
        let file = File::open(path).map_err(|source| MediaError::Unopenable {
            path: path.to_path_buf(),
            source,
        })?;

        let (library, catalog) = codec::restore(BufReader::new(file)).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Restore rejected");
            e
        })?;

        self.library = library;
        self.catalog = catalog;

        info!(
            path = %path.display(),
            records = self.library.num_records(),
            collections = self.catalog.num_collections(),
            "Data loaded"
        );
        Ok(())
    }
}
