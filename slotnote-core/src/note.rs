//! Notes attached to calendar slots.
//!
//! A note carries a title and a yes/no disposition. On disk the disposition
//! is two booleans (`checkedYes`, `checkedNo`); in memory it is a single
//! enum so the two can never both be set.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::slot::Slot;

/// Which checkbox a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Flag::Yes => write!(f, "yes"),
            Flag::No => write!(f, "no"),
        }
    }
}

/// The yes/no answer recorded on a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Undecided,
    Yes,
    No,
}

impl From<Flag> for Disposition {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Yes => Disposition::Yes,
            Flag::No => Disposition::No,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteRecord", into = "NoteRecord")]
pub struct Note {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    disposition: Disposition,
    /// Fields of the stored record this crate does not know about, written
    /// back unchanged.
    extra: Map<String, Value>,
}

impl Note {
    /// A fresh note on `slot` with neither box checked.
    pub fn new(id: String, slot: &Slot, title: String) -> Self {
        Note {
            id,
            start: slot.start(),
            end: slot.end(),
            title,
            disposition: Disposition::Undecided,
            extra: Map::new(),
        }
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn checked_yes(&self) -> bool {
        self.disposition == Disposition::Yes
    }

    pub fn checked_no(&self) -> bool {
        self.disposition == Disposition::No
    }

    /// Check `flag` and clear the other box.
    pub fn mark(&mut self, flag: Flag) {
        self.disposition = flag.into();
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

// =============================================================================
// Stored representation
// =============================================================================

/// The record shape written to storage.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: String,
    #[serde(with = "instant")]
    start: DateTime<Utc>,
    #[serde(with = "instant")]
    end: DateTime<Utc>,
    title: String,
    checked_yes: bool,
    checked_no: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<NoteRecord> for Note {
    type Error = String;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        let disposition = match (record.checked_yes, record.checked_no) {
            (false, false) => Disposition::Undecided,
            (true, false) => Disposition::Yes,
            (false, true) => Disposition::No,
            (true, true) => {
                return Err(format!(
                    "note '{}' has both checkedYes and checkedNo set",
                    record.id
                ));
            }
        };

        Ok(Note {
            id: record.id,
            start: record.start,
            end: record.end,
            title: record.title,
            disposition,
            extra: record.extra,
        })
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        NoteRecord {
            checked_yes: note.checked_yes(),
            checked_no: note.checked_no(),
            id: note.id,
            start: note.start,
            end: note.end,
            title: note.title,
            extra: note.extra,
        }
    }
}

/// Instants as millisecond ISO-8601 in UTC (`2025-03-20T10:00:00.000Z`).
/// Any RFC 3339 timestamp is accepted on read.
mod instant {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
