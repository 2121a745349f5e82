//! Decoded note model.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRAFT_COLOR, DEFAULT_NOTE_COLOR};

// ---------------------------------------------------------------------------
// NoteSize
// ---------------------------------------------------------------------------

/// Display size of a note card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl NoteSize {
    /// Fixed ordering used when grouping by size.
    pub fn rank(self) -> u8 {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for NoteSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NoteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NoteMetadata
// ---------------------------------------------------------------------------

/// Presentation hints carried alongside the note text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteMetadata {
    /// Hex color (`#rrggbb`) or a named token.
    pub color: String,
    pub size: NoteSize,
}

impl NoteMetadata {
    /// Metadata used to fill gaps in a received payload.
    pub fn received_default() -> Self {
        Self {
            color: DEFAULT_NOTE_COLOR.to_string(),
            size: NoteSize::Medium,
        }
    }

    /// Metadata preselected for a new draft.
    pub fn draft_default() -> Self {
        Self {
            color: DEFAULT_DRAFT_COLOR.to_string(),
            size: NoteSize::Medium,
        }
    }
}

impl Default for NoteMetadata {
    fn default() -> Self {
        Self::received_default()
    }
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A note decoded from one message of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Message id assigned by the messaging network; unique across sources.
    pub id: String,
    pub content: String,
    pub metadata: NoteMetadata,
    /// Address of the account that sent the message.
    pub sender_identity: String,
    pub sent_at: DateTime<Utc>,
}
