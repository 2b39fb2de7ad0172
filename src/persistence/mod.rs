//! Persisted value formats
//!
//! - Dialogues: a bare JSON array of entries. Reads also accept the
//!   versioned envelope `{"version": 1, "entries": [...]}`.
//! - Theme: the plain string `light`/`dark`. Reads also accept a JSON
//!   string literal (`"dark"`).

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::dialogue::DialogueEntry;
use crate::theme::Theme;

/// Highest envelope version this build understands
pub const ENTRIES_FORMAT_VERSION: u32 = 1;

/// Stored dialogue data that could not be turned back into entries
#[derive(Debug)]
pub enum DecodeError {
    /// Not JSON, or JSON of the wrong shape
    Json(serde_json::Error),
    /// Envelope written by a newer (or unknown) format
    UnsupportedVersion(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "invalid dialogue JSON: {e}"),
            DecodeError::UnsupportedVersion(v) => write!(
                f,
                "unsupported dialogue format version {v} (max {ENTRIES_FORMAT_VERSION})"
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
            DecodeError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e)
    }
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    entries: Vec<DialogueEntry>,
}

/// Parse the stored dialogue slot
pub fn decode_entries(raw: &str) -> Result<Vec<DialogueEntry>, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_object() {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.version == 0 || envelope.version > ENTRIES_FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(envelope.version));
        }
        return Ok(envelope.entries);
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize the full collection for the dialogue slot
pub fn encode_entries(entries: &[DialogueEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

/// Parse the stored theme slot; `None` for anything that is not a known theme
pub fn decode_theme(raw: &str) -> Option<Theme> {
    match serde_json::from_str::<String>(raw) {
        Ok(s) => Theme::from_str(&s),
        Err(_) => Theme::from_str(raw),
    }
}

pub fn encode_theme(theme: Theme) -> &'static str {
    theme.as_str()
}
