//! Record store
//!
//! Owns the in-memory dialogue list and theme, and mirrors every change
//! into the injected key-value backend. Writes go to storage first; the
//! in-memory state only changes once the write succeeded, so the two never
//! diverge.

use std::borrow::Cow;
use std::fmt;

use crate::config::StoreConfig;
use crate::dialogue::{DialogueEntry, NewDialogue, next_id, seed_entries};
use crate::filter::filter_entries;
use crate::persistence::{self, DecodeError};
use crate::platform::now_millis;
use crate::storage::{KeyValueStorage, StorageError};
use crate::theme::Theme;

/// Store operation failure
#[derive(Debug)]
pub enum StoreError {
    /// The backend refused a read or write
    Storage(StorageError),
    /// The value under `key` is not a valid dialogue list
    Corrupt { key: String, source: DecodeError },
    /// The collection could not be serialized
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(e) => write!(f, "{e}"),
            StoreError::Corrupt { key, source } => {
                write!(f, "stored value under '{key}' is corrupt: {source}")
            }
            StoreError::Encode(e) => write!(f, "failed to encode dialogues: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(e) => Some(e),
            StoreError::Corrupt { source, .. } => Some(source),
            StoreError::Encode(e) => Some(e),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::Storage(e)
    }
}

/// Dialogue collection and theme backed by a key-value store
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: S,
    config: StoreConfig,
    entries: Vec<DialogueEntry>,
    theme: Theme,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Open the store with the default slot layout
    pub fn open(storage: S) -> Result<Self, StoreError> {
        Self::with_config(storage, StoreConfig::default())
    }

    /// Open the store and load both slots
    pub fn with_config(storage: S, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self {
            storage,
            config,
            entries: Vec::new(),
            theme: Theme::default(),
        };
        store.entries = store.load_entries()?;
        store.theme = store.load_theme()?;
        log::info!(
            "Store opened: {} dialogues, {} theme",
            store.entries.len(),
            store.theme.as_str()
        );
        Ok(store)
    }

    /// Read the persisted collection, or the seed list if nothing is stored yet
    pub fn load_entries(&self) -> Result<Vec<DialogueEntry>, StoreError> {
        let key = &self.config.dialogues_key;
        match self.storage.get_item(key)? {
            Some(raw) if !raw.is_empty() => {
                let entries =
                    persistence::decode_entries(&raw).map_err(|source| StoreError::Corrupt {
                        key: key.clone(),
                        source,
                    })?;
                log::info!("Loaded {} dialogues", entries.len());
                Ok(entries)
            }
            _ => {
                log::info!("No saved dialogues, using seed data");
                Ok(seed_entries(now_millis()))
            }
        }
    }

    /// Overwrite the persisted collection and adopt it in memory
    pub fn save_entries(&mut self, entries: Vec<DialogueEntry>) -> Result<(), StoreError> {
        self.write_entries(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn write_entries(&mut self, entries: &[DialogueEntry]) -> Result<(), StoreError> {
        let json = persistence::encode_entries(entries).map_err(StoreError::Encode)?;
        self.storage.set_item(&self.config.dialogues_key, &json)?;
        log::info!("Dialogues saved ({} entries)", entries.len());
        Ok(())
    }

    /// Persisted theme; a missing or unrecognized value reads as light
    pub fn load_theme(&self) -> Result<Theme, StoreError> {
        let Some(raw) = self.storage.get_item(&self.config.theme_key)? else {
            return Ok(Theme::default());
        };
        match persistence::decode_theme(&raw) {
            Some(theme) => Ok(theme),
            None => {
                log::warn!("Unknown theme value {:?}, falling back to light", raw);
                Ok(Theme::default())
            }
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.storage
            .set_item(&self.config.theme_key, persistence::encode_theme(theme))?;
        self.theme = theme;
        log::info!("Theme saved ({})", theme.as_str());
        Ok(())
    }

    /// Flip between light and dark, returning the new theme
    pub fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        let next = self.theme.toggled();
        self.save_theme(next)?;
        Ok(next)
    }

    /// Create an entry stamped with the current time.
    ///
    /// Returns `Ok(None)` without touching anything when a field is blank.
    pub fn add_entry(
        &mut self,
        title: &str,
        original: &str,
        translation: &str,
    ) -> Result<Option<DialogueEntry>, StoreError> {
        self.add_dialogue_at(NewDialogue::new(title, original, translation), now_millis())
    }

    /// Create an entry stamped with `now` (ms) and put it at the front
    pub fn add_dialogue_at(
        &mut self,
        dialogue: NewDialogue,
        now: i64,
    ) -> Result<Option<DialogueEntry>, StoreError> {
        if !dialogue.is_complete() {
            log::debug!("Rejected dialogue with blank fields");
            return Ok(None);
        }

        let entry = dialogue.into_entry(next_id(&self.entries, now), now);
        let mut updated = Vec::with_capacity(self.entries.len() + 1);
        updated.push(entry.clone());
        updated.extend(self.entries.iter().cloned());

        self.write_entries(&updated)?;
        self.entries = updated;
        log::info!("Added dialogue {} ({})", entry.id, entry.title);
        Ok(Some(entry))
    }

    /// Remove the entry with `id`. Returns whether anything was removed;
    /// the collection is persisted either way.
    pub fn delete_entry(&mut self, id: &str) -> Result<bool, StoreError> {
        let updated: Vec<DialogueEntry> =
            self.entries.iter().filter(|e| e.id != id).cloned().collect();
        let removed = updated.len() != self.entries.len();

        self.write_entries(&updated)?;
        self.entries = updated;
        if removed {
            log::info!("Deleted dialogue {}", id);
        }
        Ok(removed)
    }

    pub fn entries(&self) -> &[DialogueEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&DialogueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Newest entries, up to the configured dashboard limit
    pub fn recent(&self) -> &[DialogueEntry] {
        self.recent_n(self.config.recent_limit)
    }

    pub fn recent_n(&self, n: usize) -> &[DialogueEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Case-insensitive search over title, original and translation
    pub fn search(&self, query: &str) -> Cow<'_, [DialogueEntry]> {
        filter_entries(&self.entries, query)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give the backend back
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use proptest::prelude::*;

    const T0: i64 = 1_700_000_000_000;

    fn empty_store() -> RecordStore<MemoryStorage> {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        store.save_entries(Vec::new()).unwrap();
        store
    }

    fn persisted(store: &RecordStore<MemoryStorage>) -> Vec<DialogueEntry> {
        let raw = store
            .storage()
            .get_item(&store.config().dialogues_key)
            .unwrap()
            .unwrap();
        persistence::decode_entries(&raw).unwrap()
    }

    #[test]
    fn test_first_run_returns_seed() {
        let store = RecordStore::open(MemoryStorage::new()).unwrap();
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.theme(), Theme::Light);
        // Opening alone writes nothing
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let mut store = empty_store();

        let first = store
            .add_dialogue_at(NewDialogue::new("Friends", "How you doin'?", "어떻게 지내?"), T0)
            .unwrap()
            .unwrap();
        assert_eq!(store.entries().len(), 1);
        assert_eq!(first.id, T0.to_string());
        assert_eq!(first.created_at, T0);

        let second = store
            .add_dialogue_at(NewDialogue::new("Suits", "I don't play the odds.", "난 확률에 안 걸어."), T0 + 5)
            .unwrap()
            .unwrap();
        assert_eq!(store.entries(), &[second, first][..]);
        assert_eq!(persisted(&store), store.entries());
    }

    #[test]
    fn test_add_same_millisecond_gets_unique_ids() {
        let mut store = empty_store();
        let a = store
            .add_dialogue_at(NewDialogue::new("a", "b", "c"), T0)
            .unwrap()
            .unwrap();
        let b = store
            .add_dialogue_at(NewDialogue::new("d", "e", "f"), T0)
            .unwrap()
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        let before = store.entries().to_vec();

        assert_eq!(store.add_entry("", "x", "y").unwrap(), None);
        assert_eq!(store.add_entry("x", "  ", "y").unwrap(), None);
        assert_eq!(store.add_entry("x", "y", "\n").unwrap(), None);
        assert_eq!(store.add_entry("\u{FEFF}", "x", "y").unwrap(), None);

        assert_eq!(store.entries(), before.as_slice());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        let before = store.entries().to_vec();

        assert!(!store.delete_entry("does-not-exist").unwrap());
        assert_eq!(store.entries(), before.as_slice());
        assert_eq!(persisted(&store), before);
    }

    #[test]
    fn test_delete_removes_entry() {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        assert!(store.delete_entry("1").unwrap());
        assert!(store.get("1").is_none());
        assert_eq!(store.entries().len(), 1);
        assert_eq!(persisted(&store), store.entries());
    }

    #[test]
    fn test_reopen_sees_saved_entries() {
        let mut store = empty_store();
        store
            .add_dialogue_at(NewDialogue::new("Friends", "How you doin'?", "어떻게 지내?"), T0)
            .unwrap();
        store.save_theme(Theme::Dark).unwrap();

        let reopened = RecordStore::open(store.into_storage()).unwrap();
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0].title, "Friends");
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn test_empty_slot_returns_seed() {
        let mut storage = MemoryStorage::new();
        storage.set_item("dramalearn_dialogues", "").unwrap();

        let store = RecordStore::open(storage).unwrap();
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_corrupt_entries_surface_as_error() {
        let mut storage = MemoryStorage::new();
        storage.set_item("dramalearn_dialogues", "{not json").unwrap();

        let err = RecordStore::open(storage).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "dramalearn_dialogues"));
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        let before = store.entries().to_vec();
        store.storage_mut().set_read_only(true);

        let err = store.add_entry("Friends", "How you doin'?", "어떻게 지내?").unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.delete_entry("1").is_err());
        assert!(store.toggle_theme().is_err());

        assert_eq!(store.entries(), before.as_slice());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(
            store.storage().get_item("dramalearn_theme").unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.load_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_reads_as_light() {
        let mut storage = MemoryStorage::new();
        storage.set_item("dramalearn_theme", "sepia").unwrap();
        let mut store = RecordStore::open(storage).unwrap();
        assert_eq!(store.theme(), Theme::Light);

        store.storage_mut().set_item("dramalearn_theme", "DARK").unwrap();
        assert_eq!(store.load_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_recent_is_capped() {
        let mut store = empty_store();
        for i in 0..7 {
            store
                .add_dialogue_at(NewDialogue::new(format!("t{i}"), "o", "t"), T0 + i)
                .unwrap();
        }
        let recent = store.recent();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "t6");
        assert_eq!(store.recent_n(100).len(), 7);
    }

    #[test]
    fn test_search_through_store() {
        let store = RecordStore::open(MemoryStorage::new()).unwrap();
        let hits = store.search("FRIENDS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn test_prefixed_config_isolates_stores() {
        let mut store =
            RecordStore::with_config(MemoryStorage::new(), StoreConfig::with_prefix("a_")).unwrap();
        store.save_theme(Theme::Dark).unwrap();

        let other = RecordStore::open(store.into_storage()).unwrap();
        assert_eq!(other.theme(), Theme::Light);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(String, String, String),
        Delete(usize),
        DeleteMissing,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            ("[ a-z]{0,6}", "[ a-z]{0,6}", "[ a-z]{0,6}").prop_map(|(t, o, tr)| Op::Add(t, o, tr)),
            (0usize..10).prop_map(Op::Delete),
            Just(Op::DeleteMissing),
        ]
    }

    proptest! {
        #[test]
        fn prop_persisted_matches_memory(ops in proptest::collection::vec(op_strategy(), 1..30)) {
            let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
            let mut now = T0;

            for op in ops {
                match op {
                    Op::Add(t, o, tr) => {
                        let before = store.entries().len();
                        let complete = !t.trim().is_empty() && !o.trim().is_empty() && !tr.trim().is_empty();
                        let added = store.add_dialogue_at(NewDialogue::new(t, o, tr), now).unwrap();
                        prop_assert_eq!(added.is_some(), complete);
                        if !complete {
                            prop_assert_eq!(store.entries().len(), before);
                            continue;
                        }
                        now += 1;
                    }
                    Op::Delete(i) => {
                        let id = store.entries().get(i).map(|e| e.id.clone());
                        if let Some(id) = id {
                            prop_assert!(store.delete_entry(&id).unwrap());
                        }
                    }
                    Op::DeleteMissing => {
                        prop_assert!(!store.delete_entry("missing").unwrap());
                    }
                }

                if store.storage().get_item("dramalearn_dialogues").unwrap().is_some() {
                    prop_assert_eq!(persisted(&store), store.entries().to_vec());
                }

                let mut ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), store.entries().len());
            }
        }
    }
}
