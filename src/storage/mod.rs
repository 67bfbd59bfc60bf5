//! JSON persistence over a string key-value store.
//!
//! Whole lists are written under fixed keys on every change. Reads never fail
//! past `load_or_default`; writes report their error to the caller.

mod samples;

pub use samples::{sample_collections, sample_notes};

use crate::models::{Note, NoteCollection, UserPreferences};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_KEY_PREFIX: &str = "creative-notes-app";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No `window` or no `localStorage` (private mode, non-browser host).
    #[error("local storage is unavailable")]
    Unavailable,

    #[error("failed to read {key}: {message}")]
    Read { key: String, message: String },

    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },

    #[error("stored value under {key} is not valid: {message}")]
    Decode { key: String, message: String },

    #[error("failed to encode value for {key}: {message}")]
    Encode { key: String, message: String },
}

/// Durable string key → string value storage with synchronous get/set.
pub trait KeyValueStore {
    /// `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }
}

/// In-memory store for tests and non-browser hosts.
///
/// Uses `RefCell` because all access happens on the UI thread.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail, as a full quota would.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.simulate_write_error.borrow() {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "Simulated write error".to_string(),
            });
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// The three keys the app persists under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    pub notes: String,
    pub collections: String,
    pub preferences: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            notes: format!("{prefix}:notes"),
            collections: format!("{prefix}:collections"),
            preferences: format!("{prefix}:preferences"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// What `seed_sample_data` wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub notes_seeded: bool,
    pub collections_seeded: bool,
}

pub struct Persistence<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Decode the value under `key`; `Ok(None)` when absent.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.store.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Like `try_load`, but any failure is logged and replaced by `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("{e}; using defaults");
                T::default()
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.set_item(key, &json)
    }

    pub fn load_notes(&self) -> Vec<Note> {
        self.load_or_default(&self.keys.notes)
    }

    pub fn save_notes(&self, notes: &[Note]) -> Result<(), StorageError> {
        self.save(&self.keys.notes, notes)
    }

    pub fn load_collections(&self) -> Vec<NoteCollection> {
        self.load_or_default(&self.keys.collections)
    }

    pub fn save_collections(&self, collections: &[NoteCollection]) -> Result<(), StorageError> {
        self.save(&self.keys.collections, collections)
    }

    pub fn load_preferences(&self) -> UserPreferences {
        self.load_or_default(&self.keys.preferences)
    }

    pub fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), StorageError> {
        self.save(&self.keys.preferences, preferences)
    }

    /// Write the sample notes and collections under keys that are truly absent.
    ///
    /// A present key is never overwritten, even when it holds an empty list.
    pub fn seed_sample_data(&self) -> Result<SeedReport, StorageError> {
        let mut report = SeedReport::default();

        let notes_absent = self.store.get_item(&self.keys.notes)?.is_none();
        let collections_absent = self.store.get_item(&self.keys.collections)?.is_none();
        if !notes_absent && !collections_absent {
            return Ok(report);
        }

        let notes = sample_notes();
        if notes_absent {
            self.save_notes(&notes)?;
            report.notes_seeded = true;
        }

        if collections_absent {
            self.save_collections(&sample_collections(&notes))?;
            report.collections_seeded = true;
        }

        log::info!(
            "seeded sample data (notes: {}, collections: {})",
            report.notes_seeded,
            report.collections_seeded
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{add_block, create_note};
    use crate::models::{BlockType, Theme};

    fn persistence() -> Persistence<MemoryStore> {
        Persistence::new(MemoryStore::new(), StorageKeys::default())
    }

    #[test]
    fn test_storage_keys_layout() {
        let keys = StorageKeys::default();
        assert_eq!(keys.notes, "creative-notes-app:notes");
        assert_eq!(keys.collections, "creative-notes-app:collections");
        assert_eq!(keys.preferences, "creative-notes-app:preferences");

        assert_eq!(StorageKeys::with_prefix("t").notes, "t:notes");
    }

    #[test]
    fn test_notes_save_then_load_is_equal() {
        let p = persistence();
        let note = create_note(Some("Draft"));
        let (note, _) = add_block(&note, BlockType::ToDo, None);
        let notes = vec![note, create_note(None)];

        p.save_notes(&notes).expect("save should succeed");
        assert_eq!(p.load_notes(), notes);
    }

    #[test]
    fn test_collections_save_then_load_is_equal() {
        let p = persistence();
        let notes = sample_notes();
        let collections = sample_collections(&notes);

        p.save_collections(&collections).expect("save should succeed");
        assert_eq!(p.load_collections(), collections);
    }

    #[test]
    fn test_absent_keys_load_defaults() {
        let p = persistence();
        assert!(p.load_notes().is_empty());
        assert!(p.load_collections().is_empty());
        assert_eq!(p.load_preferences(), UserPreferences::default());
        assert_eq!(p.try_load::<Vec<Note>>("creative-notes-app:notes"), Ok(None));
    }

    #[test]
    fn test_malformed_value_loads_default() {
        let p = persistence();
        p.store()
            .set_item(&p.keys().notes, "{not json")
            .expect("raw write should succeed");
        p.store()
            .set_item(&p.keys().preferences, "[1, 2, 3]")
            .expect("raw write should succeed");

        assert!(p.load_notes().is_empty());
        assert_eq!(p.load_preferences(), UserPreferences::default());
        assert!(matches!(
            p.try_load::<Vec<Note>>(&p.keys().notes),
            Err(StorageError::Decode { .. })
        ));
    }

    #[test]
    fn test_preferences_round_trip() {
        let p = persistence();
        let prefs = UserPreferences {
            theme: Theme::Dark,
            sidebar_collapsed: true,
            font_scale: 1.25,
            ..Default::default()
        };
        p.save_preferences(&prefs).expect("save should succeed");
        assert_eq!(p.load_preferences(), prefs);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let p = persistence();
        p.store().set_simulate_write_error(true);

        let err = p
            .save_notes(&[create_note(None)])
            .expect_err("write should fail");
        assert!(matches!(err, StorageError::Write { ref key, .. } if key == "creative-notes-app:notes"));
        assert!(p.store().is_empty());
    }

    #[test]
    fn test_seed_only_when_absent() {
        let p = persistence();

        let first = p.seed_sample_data().expect("seed should succeed");
        assert_eq!(
            first,
            SeedReport {
                notes_seeded: true,
                collections_seeded: true
            }
        );
        let seeded = p.load_notes();
        assert_eq!(seeded.len(), 3);
        assert_eq!(p.load_collections().len(), 2);

        let second = p.seed_sample_data().expect("seed should succeed");
        assert_eq!(second, SeedReport::default());
        assert_eq!(p.load_notes(), seeded);
    }

    #[test]
    fn test_seed_respects_empty_but_present_lists() {
        let p = persistence();
        p.save_notes(&[]).expect("save should succeed");

        let report = p.seed_sample_data().expect("seed should succeed");
        assert!(!report.notes_seeded);
        assert!(report.collections_seeded);
        assert!(p.load_notes().is_empty());
    }

    #[test]
    fn test_memory_store_remove_item() {
        let store = MemoryStore::new();
        store.set_item("k", "v").expect("write should succeed");
        assert_eq!(store.len(), 1);
        store.remove_item("k").expect("remove should succeed");
        assert_eq!(store.get_item("k"), Ok(None));
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::blocks::create_note;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_browser_storage_roundtrip_notes() {
        let p = Persistence::new(BrowserStorage, StorageKeys::with_prefix("creative-notes-test"));
        let _ = p.store().remove_item(&p.keys().notes);

        assert!(p.load_notes().is_empty());

        let notes = vec![create_note(Some("Draft"))];
        p.save_notes(&notes).expect("localStorage write should succeed");
        assert_eq!(p.load_notes(), notes);

        let _ = p.store().remove_item(&p.keys().notes);
        assert_eq!(p.store().get_item(&p.keys().notes), Ok(None));
    }

    #[wasm_bindgen_test]
    fn test_browser_storage_seeding() {
        let p = Persistence::new(BrowserStorage, StorageKeys::with_prefix("creative-notes-seed"));
        let _ = p.store().remove_item(&p.keys().notes);
        let _ = p.store().remove_item(&p.keys().collections);

        let report = p.seed_sample_data().expect("seed should succeed");
        assert!(report.notes_seeded && report.collections_seeded);
        assert_eq!(p.load_notes().len(), 3);

        let _ = p.store().remove_item(&p.keys().notes);
        let _ = p.store().remove_item(&p.keys().collections);
    }
}
