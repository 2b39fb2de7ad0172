//! DramaLearn - a notebook for bilingual drama/movie dialogue
//!
//! Core modules:
//! - `store`: dialogue collection and theme over a key-value backend
//! - `filter`: case-insensitive search
//! - `auth`: placeholder login/signup and session flag
//! - `storage`: LocalStorage / in-memory / JSON-file backends
//! - `persistence`: stored value formats
//! - `platform`: browser/native clock

pub mod auth;
pub mod config;
pub mod dialogue;
pub mod filter;
pub mod persistence;
pub mod platform;
pub mod storage;
pub mod store;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use auth::{AuthError, Credentials};
pub use config::StoreConfig;
pub use dialogue::{DialogueEntry, NewDialogue};
pub use filter::filter_entries;
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use store::{RecordStore, StoreError};
pub use theme::Theme;
