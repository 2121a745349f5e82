//! Filtered and sorted projections of the note collection.
//!
//! [`compose`] is pure: it copies the matching notes and re-sorts the copy
//! on every call, leaving the canonical collection untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sticky_shared::{format_address, Note};

/// Ordering requested by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    /// Group by color, lexicographic on the color string.
    Color,
    /// Group by size, `small` first.
    Size,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl SortMode {
    /// Parse a mode name, falling back to [`SortMode::Newest`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Color => "color",
            Self::Size => "size",
        }
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "color" => Ok(Self::Color),
            "size" => Ok(Self::Size),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notes matching `query`, ordered by `sort`.
///
/// A note matches when its content or its shortened sender address contains
/// the query, ignoring case. `None` or an empty query matches everything.
pub fn compose(notes: &[Note], query: Option<&str>, sort: SortMode) -> Vec<Note> {
    let mut selected: Vec<Note> = match query.filter(|q| !q.is_empty()) {
        Some(query) => {
            let needle = query.to_lowercase();
            notes
                .iter()
                .filter(|note| matches_query(note, &needle))
                .cloned()
                .collect()
        }
        None => notes.to_vec(),
    };

    match sort {
        SortMode::Newest => selected.sort_by(|a, b| b.sent_at.cmp(&a.sent_at)),
        SortMode::Oldest => selected.sort_by(|a, b| a.sent_at.cmp(&b.sent_at)),
        SortMode::Color => selected.sort_by(|a, b| a.metadata.color.cmp(&b.metadata.color)),
        SortMode::Size => selected.sort_by_key(|note| note.metadata.size.rank()),
    }

    selected
}

fn matches_query(note: &Note, needle: &str) -> bool {
    note.content.to_lowercase().contains(needle)
        || format_address(&note.sender_identity)
            .to_lowercase()
            .contains(needle)
}
