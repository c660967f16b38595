//! A single media item.

use std::fmt;

use crate::error::{MediaError, MediaResult};

/// Record identifier, assigned by the library starting at 1
pub type RecordId = u64;

/// Lowest rating a user can assign
pub const MIN_RATING: u8 = 1;

/// Highest rating a user can assign
pub const MAX_RATING: u8 = 5;

/// A titled, rated piece of media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,

    /// Single whitespace-free token such as `DVD` or `VHS`
    medium: String,

    title: String,

    /// 0 means unrated, otherwise 1..=5
    rating: u8,

    /// Number of collections currently containing this record
    membership_count: usize,
}

impl Record {
    /// Create an unrated record that belongs to no collections
    pub(crate) fn new(id: RecordId, medium: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            medium: medium.into(),
            title: title.into(),
            rating: 0,
            membership_count: 0,
        }
    }

    /// Rebuild a record from persisted fields (rating may be 0)
    pub(crate) fn restored(
        id: RecordId,
        medium: impl Into<String>,
        rating: u8,
        title: impl Into<String>,
    ) -> Self {
        Self {
            rating,
            ..Self::new(id, medium, title)
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn medium(&self) -> &str {
        &self.medium
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current rating, 0 when unrated
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn is_rated(&self) -> bool {
        self.rating != 0
    }

    pub fn membership_count(&self) -> usize {
        self.membership_count
    }

    /// Set the rating; only 1..=5 is accepted
    pub fn set_rating(&mut self, rating: i64) -> MediaResult<()> {
        if rating < i64::from(MIN_RATING) || rating > i64::from(MAX_RATING) {
            return Err(MediaError::RatingOutOfRange);
        }

        self.rating = rating as u8;
        Ok(())
    }

    /// Titles change only through the library so the title index stays in sync
    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn join_collection(&mut self) {
        self.membership_count += 1;
    }

    pub(crate) fn leave_collection(&mut self) {
        debug_assert!(self.membership_count > 0, "membership count underflow");
        self.membership_count = self.membership_count.saturating_sub(1);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rated() {
            write!(f, "{}: {} {} {}", self.id, self.medium, self.rating, self.title)
        } else {
            write!(f, "{}: {} u {}", self.id, self.medium, self.title)
        }
    }
}

/// Collapse runs of whitespace to single spaces and trim both ends.
///
/// Returns `None` if the input has no words at all.
pub fn normalize_title(raw: &str) -> Option<String> {
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Check that `title` is already in the form [`normalize_title`] produces
pub(crate) fn check_title(title: &str) -> MediaResult<()> {
    match normalize_title(title) {
        Some(normalized) if normalized == title => Ok(()),
        _ => Err(MediaError::UnreadableTitle),
    }
}

/// Check that `word` is a non-empty token with no whitespace, as used for
/// media and collection names
pub(crate) fn check_word(word: &str) -> MediaResult<()> {
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        return Err(MediaError::InvalidName);
    }
    Ok(())
}

/// Displays a list of records one per line, with no trailing newline
pub struct RecordList<'a>(pub &'a [&'a Record]);

impl fmt::Display for RecordList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}
