//! Named membership sets over library records.

use std::collections::BTreeSet;
use std::fmt;

use super::record::{Record, RecordId, RecordList};
use super::store::Library;
use crate::error::{MediaError, MediaResult};

/// A named set of records, keyed by record id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    members: BTreeSet<RecordId>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.members.contains(&id)
    }

    /// Member ids in ascending order
    pub fn member_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.members.iter().copied()
    }

    /// Add a record and bump its membership count
    pub fn add_member(&mut self, record: &mut Record) -> MediaResult<()> {
        if !self.members.insert(record.id()) {
            return Err(MediaError::AlreadyMember);
        }

        record.join_collection();
        Ok(())
    }

    /// Remove a record and drop its membership count
    pub fn delete_member(&mut self, record: &mut Record) -> MediaResult<()> {
        if !self.members.remove(&record.id()) {
            return Err(MediaError::NotMember);
        }

        record.leave_collection();
        Ok(())
    }

    /// Release every member
    pub(crate) fn clear(&mut self, library: &mut Library) {
        for id in std::mem::take(&mut self.members) {
            if let Some(record) = library.get_mut(id) {
                record.leave_collection();
            }
        }
    }

    /// Members resolved against `library`, sorted by title
    pub fn sorted_members<'a>(&self, library: &'a Library) -> Vec<&'a Record> {
        let mut records: Vec<&Record> = self
            .members
            .iter()
            .filter_map(|&id| library.find_record_by_id(id).ok())
            .collect();
        records.sort_by(|a, b| a.title().cmp(b.title()));
        records
    }

    /// Render this collection with member details from `library`
    pub fn display<'a>(&'a self, library: &'a Library) -> CollectionDisplay<'a> {
        CollectionDisplay {
            collection: self,
            library,
        }
    }
}

pub struct CollectionDisplay<'a> {
    collection: &'a Collection,
    library: &'a Library,
}

impl fmt::Display for CollectionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection {} contains:", self.collection.name)?;

        if self.collection.is_empty() {
            return write!(f, " None");
        }

        writeln!(f)?;
        write!(f, "{}", RecordList(&self.collection.sorted_members(self.library)))
    }
}
