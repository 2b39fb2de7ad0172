//! Dialogue entries
//!
//! One entry is a single line of drama/movie dialogue with its translation.

use serde::{Deserialize, Serialize};

/// Offset of the second seed entry behind the first (ms)
const SEED_SPACING_MS: i64 = 10_000;

/// A recorded line of dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueEntry {
    /// Unique within the collection
    pub id: String,
    /// Drama or movie title
    pub title: String,
    /// Source-language line
    pub original: String,
    /// Translated line
    pub translation: String,
    /// Unix timestamp (ms) when the entry was created
    pub created_at: i64,
}

impl DialogueEntry {
    /// Whether any of the searchable fields contains `needle`.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.original.to_lowercase().contains(needle)
            || self.translation.to_lowercase().contains(needle)
    }
}

/// Form input for a new entry, before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDialogue {
    pub title: String,
    pub original: String,
    pub translation: String,
}

impl NewDialogue {
    pub fn new(
        title: impl Into<String>,
        original: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            original: original.into(),
            translation: translation.into(),
        }
    }

    /// All three fields carry something other than whitespace
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.original, &self.translation]
            .iter()
            .all(|field| !is_blank(field))
    }

    /// Stamp the form with an id and creation time.
    ///
    /// Field values are kept exactly as entered.
    pub fn into_entry(self, id: String, created_at: i64) -> DialogueEntry {
        DialogueEntry {
            id,
            title: self.title,
            original: self.original,
            translation: self.translation,
            created_at,
        }
    }
}

/// Only whitespace or byte-order marks (U+FEFF), the set a browser form's `trim()` strips
fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace() || c == '\u{FEFF}')
}

/// Default collection shown before anything has been saved
pub fn seed_entries(now: i64) -> Vec<DialogueEntry> {
    vec![
        DialogueEntry {
            id: "1".to_string(),
            title: "The Office".to_string(),
            original: "Would I rather be feared or loved? Easy. Both. I want people to be afraid of how much they love me.".to_string(),
            translation: "두려움의 대상이 될까, 사랑받는 대상이 될까? 쉬운 질문이야. 둘 다. 사람들이 나를 얼마나 사랑하는지 두려워했으면 좋겠어.".to_string(),
            created_at: now,
        },
        DialogueEntry {
            id: "2".to_string(),
            title: "Stranger Things".to_string(),
            original: "Friends don't lie.".to_string(),
            translation: "친구는 거짓말 안 해.".to_string(),
            created_at: now - SEED_SPACING_MS,
        },
    ]
}

/// Pick an id for an entry created at `now` that no existing entry uses.
///
/// Ids are the creation timestamp; a collision (two adds in the same
/// millisecond, or a clash with a seed id) bumps the value until it is free.
pub fn next_id(existing: &[DialogueEntry], now: i64) -> String {
    let mut candidate = now;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
        candidate += 1;
    }
}
