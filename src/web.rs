//! Browser bindings
//!
//! `DramaLearnApp` is the object the page script holds on to. Lists cross
//! the boundary as JSON strings; errors come back as rejected `JsValue`s.

use wasm_bindgen::prelude::*;

use crate::dialogue::DialogueEntry;
use crate::storage::{KeyValueStorage, LocalStorage, MemoryStorage, StorageError};
use crate::store::RecordStore;
use crate::theme::Theme;

/// LocalStorage when the browser allows it, memory otherwise
enum WebStorage {
    Local(LocalStorage),
    Memory(MemoryStorage),
}

impl KeyValueStorage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            WebStorage::Local(s) => s.get_item(key),
            WebStorage::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            WebStorage::Local(s) => s.set_item(key, value),
            WebStorage::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        match self {
            WebStorage::Local(s) => s.remove_item(key),
            WebStorage::Memory(s) => s.remove_item(key),
        }
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json(entries: &[DialogueEntry]) -> Result<String, JsValue> {
    serde_json::to_string(entries).map_err(js_err)
}

/// Toggle the `dark` class on `<html>`
fn apply_theme(theme: Theme) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        let classes = root.class_list();
        let result = if theme.is_dark() {
            classes.add_1("dark")
        } else {
            classes.remove_1("dark")
        };
        if let Err(e) = result {
            log::warn!("Failed to apply theme: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct DramaLearnApp {
    store: RecordStore<WebStorage>,
}

#[wasm_bindgen]
impl DramaLearnApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<DramaLearnApp, JsValue> {
        let storage = match LocalStorage::open() {
            Ok(local) => WebStorage::Local(local),
            Err(e) => {
                log::warn!("{e}; dialogues will not survive a reload");
                WebStorage::Memory(MemoryStorage::new())
            }
        };
        let store = RecordStore::open(storage).map_err(js_err)?;
        apply_theme(store.theme());
        Ok(DramaLearnApp { store })
    }

    /// All entries, newest first
    pub fn entries(&self) -> Result<String, JsValue> {
        to_json(self.store.entries())
    }

    /// Dashboard slice
    pub fn recent(&self) -> Result<String, JsValue> {
        to_json(self.store.recent())
    }

    pub fn search(&self, query: &str) -> Result<String, JsValue> {
        to_json(&self.store.search(query))
    }

    /// Returns the new entry as JSON, or `undefined` if a field was blank
    #[wasm_bindgen(js_name = addEntry)]
    pub fn add_entry(
        &mut self,
        title: &str,
        original: &str,
        translation: &str,
    ) -> Result<Option<String>, JsValue> {
        let added = self
            .store
            .add_entry(title, original, translation)
            .map_err(js_err)?;
        added
            .map(|entry| serde_json::to_string(&entry).map_err(js_err))
            .transpose()
    }

    #[wasm_bindgen(js_name = deleteEntry)]
    pub fn delete_entry(&mut self, id: &str) -> Result<bool, JsValue> {
        self.store.delete_entry(id).map_err(js_err)
    }

    pub fn theme(&self) -> String {
        self.store.theme().as_str().to_string()
    }

    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> Result<String, JsValue> {
        let theme = self.store.toggle_theme().map_err(js_err)?;
        apply_theme(theme);
        Ok(theme.as_str().to_string())
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<bool, JsValue> {
        self.store.login(email, password).map_err(js_err)
    }

    pub fn register(&mut self, email: &str, password: &str) -> Result<bool, JsValue> {
        self.store.register(email, password).map_err(js_err)
    }

    pub fn logout(&mut self) -> Result<(), JsValue> {
        self.store.logout().map_err(js_err)
    }

    #[wasm_bindgen(js_name = isLoggedIn)]
    pub fn is_logged_in(&self) -> Result<bool, JsValue> {
        self.store.is_logged_in().map_err(js_err)
    }
}

/// Module start: logging and panic reporting
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("DramaLearn core loaded");
}
