//! Save file format.
//!
//! ```text
//! <numRecords>
//! <id> <medium> <rating> <title>     (numRecords lines, ascending by title)
//! <numCollections>
//! <name> <memberCount>               (per collection, ascending by name)
//! <memberTitle>                      (memberCount lines, ascending by title)
//! ```
//!
//! Restores build fresh values and hand them back only when the whole input
//! parsed, so a caller's existing state is never partially overwritten.

use std::io::{BufRead, Write};

use super::scanner::Scanner;
use crate::error::{MediaError, MediaResult};
use crate::library::record::check_title;
use crate::library::{Catalog, Collection, Library, Record, RecordId};

/// Write a library followed by its catalog
pub fn save<W: Write>(library: &Library, catalog: &Catalog, writer: &mut W) -> MediaResult<()> {
    save_library(library, writer)?;
    save_catalog(catalog, library, writer)?;
    writer.flush().map_err(MediaError::Write)
}

pub fn save_library<W: Write>(library: &Library, writer: &mut W) -> MediaResult<()> {
    writeln!(writer, "{}", library.num_records()).map_err(MediaError::Write)?;

    for record in library.sorted_records() {
        save_record(record, writer)?;
    }
    Ok(())
}

fn save_record<W: Write>(record: &Record, writer: &mut W) -> MediaResult<()> {
    writeln!(
        writer,
        "{} {} {} {}",
        record.id(),
        record.medium(),
        record.rating(),
        record.title()
    )
    .map_err(MediaError::Write)
}

/// Write a catalog; member titles are looked up in `library`
pub fn save_catalog<W: Write>(
    catalog: &Catalog,
    library: &Library,
    writer: &mut W,
) -> MediaResult<()> {
    writeln!(writer, "{}", catalog.num_collections()).map_err(MediaError::Write)?;

    for collection in catalog.collections() {
        save_collection(collection, library, writer)?;
    }
    Ok(())
}

fn save_collection<W: Write>(
    collection: &Collection,
    library: &Library,
    writer: &mut W,
) -> MediaResult<()> {
    writeln!(writer, "{} {}", collection.name(), collection.len()).map_err(MediaError::Write)?;

    for record in collection.sorted_members(library) {
        writeln!(writer, "{}", record.title()).map_err(MediaError::Write)?;
    }
    Ok(())
}

/// Read a library and a catalog that refers to it
pub fn restore<R: BufRead>(reader: R) -> MediaResult<(Library, Catalog)> {
    let mut scanner = Scanner::new(reader);

    let mut library = restore_library(&mut scanner)?;
    let catalog = restore_catalog(&mut scanner, &mut library)?;

    Ok((library, catalog))
}

/// Read a non-negative count, mapping anything else to `InvalidFile`
fn read_count<R: BufRead>(scanner: &mut Scanner<R>) -> MediaResult<usize> {
    let count = scanner
        .read_int()
        .map_err(|_| MediaError::InvalidFile)?
        .ok_or(MediaError::InvalidFile)?;

    usize::try_from(count).map_err(|_| MediaError::InvalidFile)
}

pub fn restore_library<R: BufRead>(scanner: &mut Scanner<R>) -> MediaResult<Library> {
    let count = read_count(scanner)?;
    let mut library = Library::new();

    for _ in 0..count {
        let record = restore_record(scanner)?;
        library.insert_restored(record)?;
    }

    Ok(library)
}

fn restore_record<R: BufRead>(scanner: &mut Scanner<R>) -> MediaResult<Record> {
    let invalid = |_: std::io::Error| MediaError::InvalidFile;

    let id = scanner
        .read_int()
        .map_err(invalid)?
        .and_then(|id| RecordId::try_from(id).ok())
        .filter(|&id| id >= 1)
        .ok_or(MediaError::InvalidFile)?;

    let medium = scanner.read_word().map_err(invalid)?;
    if medium.is_empty() {
        return Err(MediaError::InvalidFile);
    }

    let rating = scanner
        .read_int()
        .map_err(invalid)?
        .and_then(|rating| u8::try_from(rating).ok())
        .filter(|&rating| rating <= crate::library::record::MAX_RATING)
        .ok_or(MediaError::InvalidFile)?;

    scanner.skip_whitespace().map_err(invalid)?;
    let title = scanner.read_line().map_err(invalid)?;
    check_title(&title).map_err(|_| MediaError::InvalidFile)?;

    Ok(Record::restored(id, medium, rating, title))
}

/// Read a catalog, resolving member titles against (and counting them in) `library`
pub fn restore_catalog<R: BufRead>(
    scanner: &mut Scanner<R>,
    library: &mut Library,
) -> MediaResult<Catalog> {
    let count = read_count(scanner)?;
    let mut catalog = Catalog::new();

    for _ in 0..count {
        let collection = restore_collection(scanner, library)?;
        catalog.insert_restored(collection)?;
    }

    Ok(catalog)
}

fn restore_collection<R: BufRead>(
    scanner: &mut Scanner<R>,
    library: &mut Library,
) -> MediaResult<Collection> {
    let invalid = |_: std::io::Error| MediaError::InvalidFile;

    let name = scanner.read_word().map_err(invalid)?;
    if name.is_empty() {
        return Err(MediaError::InvalidFile);
    }

    let count = read_count(scanner)?;
    scanner.read_line().map_err(invalid)?;

    let mut collection = Collection::new(name);
    for _ in 0..count {
        let title = scanner.read_line().map_err(invalid)?;
        let id = library
            .find_record_by_title(&title)
            .map_err(|_| MediaError::InvalidFile)?
            .id();
        let record = library
            .find_record_by_id_mut(id)
            .map_err(|_| MediaError::InvalidFile)?;

        collection
            .add_member(record)
            .map_err(|_| MediaError::InvalidFile)?;
    }

    Ok(collection)
}
