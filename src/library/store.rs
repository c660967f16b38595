//! The record store.
//!
//! Records live in a single table keyed by id. Titles are a secondary index
//! mapping title -> id, so renaming a record only re-keys the index.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::RegexBuilder;
use tracing::debug;

use super::catalog::Catalog;
use super::record::{check_title, check_word, Record, RecordId, RecordList};
use crate::error::{MediaError, MediaResult};

/// Sentinel printed in place of an empty record listing
pub const LIBRARY_EMPTY: &str = "Library is empty";

/// Set of records indexed by title and by id
#[derive(Debug, Clone)]
pub struct Library {
    records: BTreeMap<RecordId, Record>,
    by_title: HashMap<String, RecordId>,
    next_id: RecordId,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Create an empty library; the first record gets id 1
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            by_title: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add a new unrated record and return its id.
    ///
    /// `medium` must be a single word and `title` already normalized, so the
    /// record can be written to and read back from a save file unchanged.
    pub fn add_record(&mut self, medium: &str, title: &str) -> MediaResult<RecordId> {
        check_word(medium)?;
        check_title(title)?;
        if self.by_title.contains_key(title) {
            return Err(MediaError::DuplicateTitle);
        }

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(MediaError::IdsExhausted)?;

        self.by_title.insert(title.to_string(), id);
        self.records.insert(id, Record::new(id, medium, title));

        debug!(id, medium, title, "Record added");
        Ok(id)
    }

    pub fn find_record_by_title(&self, title: &str) -> MediaResult<&Record> {
        self.by_title
            .get(title)
            .and_then(|id| self.records.get(id))
            .ok_or(MediaError::NoRecordWithTitle)
    }

    pub fn find_record_by_id(&self, id: RecordId) -> MediaResult<&Record> {
        self.records.get(&id).ok_or(MediaError::NoRecordWithId)
    }

    pub fn find_record_by_id_mut(&mut self, id: RecordId) -> MediaResult<&mut Record> {
        self.records.get_mut(&id).ok_or(MediaError::NoRecordWithId)
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Remove a record by title.
    ///
    /// Records that belong to any collection cannot be deleted; remove them
    /// from every collection first.
    pub fn delete_record(&mut self, title: &str) -> MediaResult<Record> {
        let id = *self
            .by_title
            .get(title)
            .ok_or(MediaError::NoRecordWithTitle)?;

        match self.records.get(&id) {
            Some(record) if record.membership_count() > 0 => {
                return Err(MediaError::RecordInUse);
            }
            Some(_) => {}
            None => return Err(MediaError::NoRecordWithTitle),
        }

        self.by_title.remove(title);
        let record = self
            .records
            .remove(&id)
            .ok_or(MediaError::NoRecordWithTitle)?;

        debug!(id, title, "Record deleted");
        Ok(record)
    }

    /// Rename a record, keeping its id and collection memberships
    pub fn modify_title(&mut self, id: RecordId, new_title: &str) -> MediaResult<()> {
        check_title(new_title)?;
        if let Some(&owner) = self.by_title.get(new_title) {
            if owner == id {
                return Ok(());
            }
            return Err(MediaError::DuplicateTitle);
        }

        let record = self.records.get_mut(&id).ok_or(MediaError::NoRecordWithId)?;
        self.by_title.remove(record.title());
        record.set_title(new_title.to_string());
        self.by_title.insert(new_title.to_string(), id);

        debug!(id, title = new_title, "Record retitled");
        Ok(())
    }

    /// Drop every record and reset id allocation.
    ///
    /// Refused while any collection in `catalog` still has members.
    pub fn clear(&mut self, catalog: &Catalog) -> MediaResult<()> {
        if catalog.collections().any(|c| !c.is_empty()) {
            return Err(MediaError::CollectionsNotEmpty);
        }

        *self = Self::new();
        debug!("Library cleared");
        Ok(())
    }

    /// Empty the catalog (releasing memberships) and then the library
    pub fn clear_all(&mut self, catalog: &mut Catalog) {
        catalog.clear(self);
        *self = Self::new();
        debug!("Library and catalog cleared");
    }

    /// Case-insensitive literal substring search over titles, sorted by title.
    ///
    /// Matching uses Unicode simple case folding, so `ſ` matches `s` and the
    /// Kelvin sign matches `k`.
    pub fn find_string(&self, substr: &str) -> MediaResult<Vec<&Record>> {
        let needle = RegexBuilder::new(&regex::escape(substr))
            .case_insensitive(true)
            .build()
            .map_err(|_| MediaError::NoMatches)?;

        let matches: Vec<&Record> = self
            .sorted_records()
            .into_iter()
            .filter(|record| needle.is_match(record.title()))
            .collect();

        if matches.is_empty() {
            return Err(MediaError::NoMatches);
        }

        Ok(matches)
    }

    /// All records by rating (highest first), ties broken by title
    pub fn list_ratings(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|a, b| {
            (Reverse(a.rating()), a.title()).cmp(&(Reverse(b.rating()), b.title()))
        });
        records
    }

    /// All records sorted by title
    pub fn sorted_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|a, b| a.title().cmp(b.title()));
        records
    }

    /// Iterate records in id order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id the next added record will receive
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    /// Insert a record read back from a save file.
    ///
    /// Duplicate ids or titles mean the file is corrupt, as does an id with no
    /// allocatable successor.
    pub(crate) fn insert_restored(&mut self, record: Record) -> MediaResult<()> {
        let id = record.id();
        let successor = id.checked_add(1).ok_or(MediaError::InvalidFile)?;

        if self.records.contains_key(&id) || self.by_title.contains_key(record.title()) {
            return Err(MediaError::InvalidFile);
        }

        self.by_title.insert(record.title().to_string(), id);
        self.records.insert(id, record);
        self.next_id = self.next_id.max(successor);

        Ok(())
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}", LIBRARY_EMPTY);
        }

        writeln!(f, "Library contains {} records:", self.num_records())?;
        write!(f, "{}", RecordList(&self.sorted_records()))
    }
}
