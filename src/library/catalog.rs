//! Catalog of named collections.
//!
//! Collections only hold record ids; any operation that changes membership
//! takes the [`Library`] so the per-record membership counts stay in sync.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

use super::collection::Collection;
use super::record::{check_word, RecordId};
use super::store::Library;
use crate::error::{MediaError, MediaResult};

/// All collections, keyed (and therefore ordered) by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    collections: BTreeMap<String, Collection>,
}

/// Aggregate membership figures across the whole catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Distinct records in at least one collection
    pub in_at_least_one: usize,

    /// Distinct records in two or more collections
    pub in_more_than_one: usize,

    /// Sum of all collection sizes
    pub total_memberships: usize,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty collection; `name` must be a single word
    pub fn add_collection(&mut self, name: &str) -> MediaResult<()> {
        check_word(name)?;
        if self.collections.contains_key(name) {
            return Err(MediaError::DuplicateCollection);
        }

        self.collections
            .insert(name.to_string(), Collection::new(name));

        debug!(name, "Collection added");
        Ok(())
    }

    pub fn find_collection(&self, name: &str) -> MediaResult<&Collection> {
        self.collections.get(name).ok_or(MediaError::NoCollection)
    }

    pub fn find_collection_mut(&mut self, name: &str) -> MediaResult<&mut Collection> {
        self.collections.get_mut(name).ok_or(MediaError::NoCollection)
    }

    /// Release a collection's members and remove it
    pub fn delete_collection(&mut self, name: &str, library: &mut Library) -> MediaResult<()> {
        let mut collection = self
            .collections
            .remove(name)
            .ok_or(MediaError::NoCollection)?;
        collection.clear(library);

        debug!(name, "Collection deleted");
        Ok(())
    }

    /// Release every collection's members and remove them all
    pub fn clear(&mut self, library: &mut Library) {
        for collection in self.collections.values_mut() {
            collection.clear(library);
        }
        self.collections.clear();

        debug!("Catalog cleared");
    }

    pub fn collection_statistics(&self) -> CollectionStats {
        let mut occurrences: HashMap<RecordId, usize> = HashMap::new();
        let mut stats = CollectionStats::default();

        for collection in self.collections.values() {
            stats.total_memberships += collection.len();

            for id in collection.member_ids() {
                let count = occurrences.entry(id).or_insert(0);
                *count += 1;

                match *count {
                    1 => stats.in_at_least_one += 1,
                    2 => stats.in_more_than_one += 1,
                    _ => {}
                }
            }
        }

        stats
    }

    /// Create `dst_name` holding the union of two existing collections.
    ///
    /// Records present in both sources are added once. Sources are untouched.
    pub fn combine_collections(
        &mut self,
        first: &str,
        second: &str,
        dst_name: &str,
        library: &mut Library,
    ) -> MediaResult<()> {
        let first_members = self.find_collection(first)?.member_ids();
        let second_members = self.find_collection(second)?.member_ids();
        let union: BTreeSet<RecordId> = first_members.chain(second_members).collect();

        check_word(dst_name)?;
        if self.collections.contains_key(dst_name) {
            return Err(MediaError::DuplicateCollection);
        }

        let mut dst = Collection::new(dst_name);
        for id in union {
            if let Some(record) = library.get_mut(id) {
                dst.add_member(record)?;
            }
        }

        debug!(first, second, dst = dst_name, members = dst.len(), "Collections combined");
        self.collections.insert(dst_name.to_string(), dst);
        Ok(())
    }

    /// Iterate collections in name order
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn num_collections(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Number of collections that contain `id`, computed by scanning
    pub fn memberships_of(&self, id: RecordId) -> usize {
        self.collections.values().filter(|c| c.contains(id)).count()
    }

    /// Render the catalog with member details from `library`
    pub fn display<'a>(&'a self, library: &'a Library) -> CatalogDisplay<'a> {
        CatalogDisplay {
            catalog: self,
            library,
        }
    }

    /// Insert a collection read back from a save file
    pub(crate) fn insert_restored(&mut self, collection: Collection) -> MediaResult<()> {
        if self.collections.contains_key(collection.name()) {
            return Err(MediaError::InvalidFile);
        }

        self.collections
            .insert(collection.name().to_string(), collection);
        Ok(())
    }
}

pub struct CatalogDisplay<'a> {
    catalog: &'a Catalog,
    library: &'a Library,
}

impl fmt::Display for CatalogDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_empty() {
            return write!(f, "Catalog is empty");
        }

        write!(
            f,
            "Catalog contains {} collections:",
            self.catalog.num_collections()
        )?;
        for collection in self.catalog.collections() {
            writeln!(f)?;
            write!(f, "{}", collection.display(self.library))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with(titles: &[&str]) -> Library {
        let mut library = Library::new();
        for title in titles {
            library.add_record("DVD", title).unwrap();
        }
        library
    }

    fn add(catalog: &mut Catalog, library: &mut Library, name: &str, id: RecordId) {
        let record = library.find_record_by_id_mut(id).unwrap();
        catalog
            .find_collection_mut(name)
            .unwrap()
            .add_member(record)
            .unwrap();
    }

    #[test]
    fn test_catalog_add_and_get() {
        let mut catalog = Catalog::new();
        catalog.add_collection("Favorites").unwrap();

        assert_eq!(catalog.num_collections(), 1);
        assert!(catalog.find_collection("Favorites").is_ok());
        assert!(matches!(
            catalog.find_collection("Missing"),
            Err(MediaError::NoCollection)
        ));
        assert!(matches!(
            catalog.add_collection("Favorites"),
            Err(MediaError::DuplicateCollection)
        ));
    }

    #[test]
    fn test_catalog_rejects_unsaveable_names() {
        let mut catalog = Catalog::new();

        assert!(matches!(
            catalog.add_collection("My Faves"),
            Err(MediaError::InvalidName)
        ));
        assert!(matches!(catalog.add_collection(""), Err(MediaError::InvalidName)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_delete_releases_members() {
        let mut library = library_with(&["A", "B"]);
        let mut catalog = Catalog::new();
        catalog.add_collection("One").unwrap();
        add(&mut catalog, &mut library, "One", 1);
        add(&mut catalog, &mut library, "One", 2);

        catalog.delete_collection("One", &mut library).unwrap();

        assert!(catalog.is_empty());
        assert_eq!(library.find_record_by_id(1).unwrap().membership_count(), 0);
        assert!(matches!(
            catalog.delete_collection("One", &mut library),
            Err(MediaError::NoCollection)
        ));
    }

    #[test]
    fn test_catalog_statistics() {
        let mut library = library_with(&["A", "B", "C", "D"]);
        let mut catalog = Catalog::new();
        for name in ["X", "Y", "Z"] {
            catalog.add_collection(name).unwrap();
        }
        add(&mut catalog, &mut library, "X", 1);
        add(&mut catalog, &mut library, "X", 2);
        add(&mut catalog, &mut library, "Y", 1);
        add(&mut catalog, &mut library, "Z", 1);
        add(&mut catalog, &mut library, "Z", 3);

        let stats = catalog.collection_statistics();
        assert_eq!(
            stats,
            CollectionStats {
                in_at_least_one: 3,
                in_more_than_one: 1,
                total_memberships: 5,
            }
        );
    }

    #[test]
    fn test_catalog_combine_is_set_union() {
        let mut library = library_with(&["A", "B", "C"]);
        let mut catalog = Catalog::new();
        catalog.add_collection("First").unwrap();
        catalog.add_collection("Second").unwrap();
        add(&mut catalog, &mut library, "First", 1);
        add(&mut catalog, &mut library, "First", 2);
        add(&mut catalog, &mut library, "Second", 2);
        add(&mut catalog, &mut library, "Second", 3);

        catalog
            .combine_collections("First", "Second", "Both", &mut library)
            .unwrap();

        let both = catalog.find_collection("Both").unwrap();
        assert_eq!(both.member_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(catalog.find_collection("First").unwrap().len(), 2);
        assert_eq!(catalog.find_collection("Second").unwrap().len(), 2);

        // Record 2 is in First, Second and Both
        assert_eq!(library.find_record_by_id(2).unwrap().membership_count(), 3);
        assert_eq!(library.find_record_by_id(1).unwrap().membership_count(), 2);
    }

    #[test]
    fn test_catalog_combine_errors() {
        let mut library = library_with(&["A"]);
        let mut catalog = Catalog::new();
        catalog.add_collection("First").unwrap();
        catalog.add_collection("Second").unwrap();

        assert!(matches!(
            catalog.combine_collections("Nope", "Second", "Dst", &mut library),
            Err(MediaError::NoCollection)
        ));
        assert!(matches!(
            catalog.combine_collections("First", "Nope", "Dst", &mut library),
            Err(MediaError::NoCollection)
        ));
        assert!(matches!(
            catalog.combine_collections("First", "Second", "Second", &mut library),
            Err(MediaError::DuplicateCollection)
        ));
        assert!(matches!(
            catalog.combine_collections("First", "Second", "Two Words", &mut library),
            Err(MediaError::InvalidName)
        ));
        assert_eq!(catalog.num_collections(), 2);
    }

    #[test]
    fn test_catalog_display() {
        let mut library = library_with(&["A"]);
        let mut catalog = Catalog::new();
        assert_eq!(catalog.display(&library).to_string(), "Catalog is empty");

        catalog.add_collection("Zed").unwrap();
        catalog.add_collection("Alpha").unwrap();
        add(&mut catalog, &mut library, "Zed", 1);

        assert_eq!(
            catalog.display(&library).to_string(),
            "Catalog contains 2 collections:\n\
             Collection Alpha contains: None\n\
             Collection Zed contains:\n1: DVD u A"
        );
    }
}
