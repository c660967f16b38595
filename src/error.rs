//! Error type shared by the library, catalog, codec and shell.
//!
//! Every error carries two independent pieces of information: the message
//! shown to the user and a [`RecoveryHint`] telling the shell whether the
//! rest of the current input line should be thrown away.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by media catalog operations
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("No record with that title!")]
    NoRecordWithTitle,

    #[error("No record with that ID!")]
    NoRecordWithId,

    #[error("Library already has a record with this title!")]
    DuplicateTitle,

    #[error("No collection with that name!")]
    NoCollection,

    #[error("Catalog already has a collection with this name!")]
    DuplicateCollection,

    #[error("Cannot delete a record that is a member of a collection!")]
    RecordInUse,

    #[error("Cannot clear all records unless all collections are empty!")]
    CollectionsNotEmpty,

    #[error("Rating is out of range!")]
    RatingOutOfRange,

    #[error("Record is already a member in the collection!")]
    AlreadyMember,

    #[error("Record is not a member in the collection!")]
    NotMember,

    #[error("No records contain that string!")]
    NoMatches,

    #[error("Invalid data found in file!")]
    InvalidFile,

    #[error("Could not open file!")]
    Unopenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write file!")]
    Write(#[source] std::io::Error),

    #[error("Could not read an integer value!")]
    UnreadableInteger,

    #[error("Could not read a title!")]
    UnreadableTitle,

    #[error("Name must be a single word!")]
    InvalidName,

    #[error("No more record IDs available!")]
    IdsExhausted,
}

/// Coarse classification of a [`MediaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced record, collection or match does not exist
    NotFound,

    /// Creation collides with an existing unique key
    Duplicate,

    /// Deletion blocked by outstanding references
    InUse,

    /// Numeric value outside its domain
    Range,

    /// Record is already in the collection
    AlreadyMember,

    /// Record is not in the collection
    NotMember,

    /// Persisted data is malformed
    InvalidFormat,

    /// Filesystem failure on a save/restore target
    Io,

    /// Interactive input could not be tokenized
    Input,
}

/// What the caller should do with the unconsumed remainder of its input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Input was malformed; drop the rest of the line
    DiscardRestOfLine,

    /// Input was well-formed but rejected; leave the line alone
    Keep,
}

impl MediaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::NoRecordWithTitle
            | MediaError::NoRecordWithId
            | MediaError::NoCollection
            | MediaError::NoMatches => ErrorKind::NotFound,
            MediaError::DuplicateTitle | MediaError::DuplicateCollection => ErrorKind::Duplicate,
            MediaError::RecordInUse | MediaError::CollectionsNotEmpty => ErrorKind::InUse,
            MediaError::RatingOutOfRange | MediaError::IdsExhausted => ErrorKind::Range,
            MediaError::AlreadyMember => ErrorKind::AlreadyMember,
            MediaError::NotMember => ErrorKind::NotMember,
            MediaError::InvalidFile => ErrorKind::InvalidFormat,
            MediaError::Unopenable { .. } | MediaError::Write(_) => ErrorKind::Io,
            MediaError::UnreadableInteger
            | MediaError::UnreadableTitle
            | MediaError::InvalidName => ErrorKind::Input,
        }
    }

    pub fn recovery(&self) -> RecoveryHint {
        match self {
            // These fire after the whole argument line was consumed, or on
            // input that was valid but semantically rejected.
            MediaError::NoRecordWithTitle
            | MediaError::DuplicateTitle
            | MediaError::RecordInUse
            | MediaError::UnreadableTitle
            | MediaError::IdsExhausted => RecoveryHint::Keep,
            _ => RecoveryHint::DiscardRestOfLine,
        }
    }

    /// Returns true if the caller should discard the rest of its input line
    pub fn discards_line(&self) -> bool {
        self.recovery() == RecoveryHint::DiscardRestOfLine
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
