//! Save File Integration Tests
//!
//! Tests for save/restore round trips and rejection of malformed files.

use std::collections::BTreeMap;
use std::fs;

use mediacat::{ErrorKind, MediaError, RecordId, Session};
use tempfile::TempDir;

/// Records as (id, medium, rating, title), collections as name -> member ids
type Snapshot = (
    Vec<(RecordId, String, u8, String)>,
    BTreeMap<String, Vec<RecordId>>,
);

fn snapshot(session: &Session) -> Snapshot {
    let records = session
        .library()
        .records()
        .map(|r| (r.id(), r.medium().to_string(), r.rating(), r.title().to_string()))
        .collect();
    let collections = session
        .catalog()
        .collections()
        .map(|c| (c.name().to_string(), c.member_ids().collect()))
        .collect();
    (records, collections)
}

fn populated() -> Session {
    let mut session = Session::new();
    let matrix = session.add_record("DVD", "The Matrix").unwrap();
    let blue = session.add_record("CD", "Kind of Blue").unwrap();
    let doomed = session.add_record("VHS", "Doomed").unwrap();
    let alien = session.add_record("VHS", "Alien").unwrap();
    session.delete_record("Doomed").unwrap();
    assert_eq!(doomed, 3);

    session.set_rating(matrix, 5).unwrap();
    session.set_rating(alien, 4).unwrap();

    session.add_collection("SciFi").unwrap();
    session.add_collection("Music").unwrap();
    session.add_collection("Empty").unwrap();
    session.add_member("SciFi", matrix).unwrap();
    session.add_member("SciFi", alien).unwrap();
    session.add_member("Music", blue).unwrap();
    session.add_member("Music", matrix).unwrap();
    session
}

#[test]
fn test_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.txt");

    let original = populated();
    original.save_all(&path).unwrap();

    let mut restored = Session::new();
    restored.restore_all(&path).unwrap();

    assert_eq!(snapshot(&restored), snapshot(&original));

    // Highest surviving id is 4, so allocation resumes at 5
    assert_eq!(restored.library().next_id(), 5);

    let matrix = restored.library().find_record_by_title("The Matrix").unwrap();
    assert_eq!(matrix.membership_count(), 2);

    // Saving the restored state reproduces the file byte for byte
    let again = temp.path().join("again.txt");
    restored.save_all(&again).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        fs::read_to_string(&again).unwrap()
    );
}

#[test]
fn test_saved_file_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.txt");

    populated().save_all(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "3\n\
         4 VHS 4 Alien\n\
         2 CD 0 Kind of Blue\n\
         1 DVD 5 The Matrix\n\
         3\n\
         Empty 0\n\
         Music 2\n\
         Kind of Blue\n\
         The Matrix\n\
         SciFi 2\n\
         Alien\n\
         The Matrix\n"
    );
}

#[test]
fn test_invalid_files_leave_state_untouched() {
    let temp = TempDir::new().unwrap();
    let cases = [
        ("negative_count", "-1\n0\n"),
        ("rating_six", "1\n1 DVD 6 Heat\n0\n"),
        ("duplicate_id", "2\n1 DVD 2 Heat\n1 CD 3 Cold\n0\n"),
        ("unknown_member", "1\n1 DVD 2 Heat\n1\nFaves 1\nCold\n"),
    ];

    for (name, contents) in cases {
        let path = temp.path().join(name);
        fs::write(&path, contents).unwrap();

        let mut session = populated();
        let before = snapshot(&session);

        let err = session.restore_all(&path).unwrap_err();
        assert!(matches!(err, MediaError::InvalidFile), "{}: {:?}", name, err);
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(snapshot(&session), before, "{}: state changed", name);
        assert_eq!(session.library().next_id(), 5);
    }
}

#[test]
fn test_restore_replaces_existing_state() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("small.txt");
    fs::write(&path, "1\n9 LP 0 Abbey Road\n1\nBeatles 1\nAbbey Road\n").unwrap();

    let mut session = populated();
    session.restore_all(&path).unwrap();

    assert_eq!(session.allocations().records, 1);
    assert_eq!(session.allocations().collections, 1);
    assert_eq!(session.library().next_id(), 10);
    assert!(session.library().find_record_by_title("The Matrix").is_err());
    assert_eq!(
        session
            .library()
            .find_record_by_id(9)
            .unwrap()
            .membership_count(),
        1
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let mut session = Session::new();

    let err = session.restore_all(&temp.path().join("nope.txt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.to_string(), "Could not open file!");
}

#[test]
fn test_unsaveable_values_are_refused_up_front() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.txt");

    let mut session = populated();
    assert!(matches!(
        session.add_record("Blu ray", "Heat"),
        Err(MediaError::InvalidName)
    ));
    assert!(matches!(
        session.add_record("DVD", "  Heat"),
        Err(MediaError::UnreadableTitle)
    ));
    assert!(matches!(
        session.add_collection("My Faves"),
        Err(MediaError::InvalidName)
    ));
    assert!(matches!(
        session.combine_collections("SciFi", "Music", "Sci Music"),
        Err(MediaError::InvalidName)
    ));
    let matrix = session.library().find_record_by_title("The Matrix").unwrap().id();
    assert!(matches!(
        session.modify_title(matrix, "The Matrix "),
        Err(MediaError::UnreadableTitle)
    ));

    // Whatever the core accepted survives a save and restore unchanged
    session.save_all(&path).unwrap();
    let mut restored = Session::new();
    restored.restore_all(&path).unwrap();
    assert_eq!(snapshot(&restored), snapshot(&session));
}

#[test]
fn test_large_ids_keep_allocating() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.txt");
    fs::write(&path, "1\n4294967295 DVD 3 Big\n1\nFaves 1\nBig\n").unwrap();

    let mut session = Session::new();
    session.restore_all(&path).unwrap();

    let next = session.add_record("VHS", "Next").unwrap();
    assert_eq!(next, 4_294_967_296);
    assert_eq!(session.allocations().records, 2);
    assert_eq!(
        session.library().find_record_by_title("Big").unwrap().title(),
        "Big"
    );
    assert_eq!(
        session.library().find_record_by_id(next).unwrap().title(),
        "Next"
    );

    // The grown library saves and restores with its ids intact
    session.save_all(&path).unwrap();
    let mut restored = Session::new();
    restored.restore_all(&path).unwrap();
    assert_eq!(snapshot(&restored), snapshot(&session));
    assert_eq!(restored.library().next_id(), 4_294_967_297);
}
