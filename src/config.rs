//! Store configuration
//!
//! Storage slot names and list limits. Hosts can deserialize an override;
//! anything left out keeps its default.

use serde::{Deserialize, Serialize};

/// Number of entries shown on the dashboard
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Storage keys and view limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Slot holding the JSON dialogue array
    pub dialogues_key: String,
    /// Slot holding the theme string
    pub theme_key: String,
    /// Slot holding the logged-in flag
    pub session_key: String,
    /// How many entries `recent()` returns
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dialogues_key: "dramalearn_dialogues".to_string(),
            theme_key: "dramalearn_theme".to_string(),
            session_key: "dramalearn_session".to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl StoreConfig {
    /// Same layout with every key prefixed, so several stores can share one backend
    pub fn with_prefix(prefix: &str) -> Self {
        let base = Self::default();
        Self {
            dialogues_key: format!("{prefix}{}", base.dialogues_key),
            theme_key: format!("{prefix}{}", base.theme_key),
            session_key: format!("{prefix}{}", base.session_key),
            ..base
        }
    }
}
