use crate::blocks;
use crate::models::{BlockType, MoveDirection, Note, NoteCollection, UserPreferences};
use crate::storage::{KeyValueStore, Persistence, StorageError, StorageKeys};
use crate::util::{generate_id, now};

/// Owned application state: notes, collections, preferences and the open note.
///
/// Every mutation that changes a list writes the full list back to storage
/// before returning. Write failures are logged and kept in
/// `last_storage_error`; the in-memory state stays authoritative.
pub struct NotesStore<S> {
    persistence: Persistence<S>,
    notes: Vec<Note>,
    collections: Vec<NoteCollection>,
    preferences: UserPreferences,
    /// The open note is tracked by id so it can never drift from its entry in `notes`.
    current_note_id: Option<String>,
    last_storage_error: Option<StorageError>,
}

impl<S: KeyValueStore> NotesStore<S> {
    /// Load state from `store`, seeding the sample notes first when `seed` is set.
    pub fn open(store: S, keys: StorageKeys, seed: bool) -> Self {
        let persistence = Persistence::new(store, keys);

        let mut last_storage_error = None;
        if seed {
            if let Err(e) = persistence.seed_sample_data() {
                log::error!("failed to seed sample data: {e}");
                last_storage_error = Some(e);
            }
        }

        let notes = persistence.load_notes();
        let collections = persistence.load_collections();
        let preferences = persistence.load_preferences();
        log::debug!(
            "loaded {} notes and {} collections",
            notes.len(),
            collections.len()
        );

        Self {
            persistence,
            notes,
            collections,
            preferences,
            current_note_id: None,
            last_storage_error,
        }
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn collections(&self) -> &[NoteCollection] {
        &self.collections
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn collection(&self, id: &str) -> Option<&NoteCollection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.current_note_id.as_deref().and_then(|id| self.note(id))
    }

    pub fn current_note_id(&self) -> Option<&str> {
        self.current_note().map(|n| n.id.as_str())
    }

    /// Most recent persistence failure, until cleared.
    pub fn last_storage_error(&self) -> Option<&StorageError> {
        self.last_storage_error.as_ref()
    }

    pub fn clear_storage_error(&mut self) {
        self.last_storage_error = None;
    }

    /// Open the note with `id`, or close the current one with `None`.
    /// Unknown ids close the current note.
    pub fn set_current_note(&mut self, id: Option<&str>) {
        self.current_note_id = id.and_then(|id| self.note(id)).map(|n| n.id.clone());
    }

    // --- Notes ---

    pub fn create_note(&mut self, title: Option<&str>) -> Note {
        let note = blocks::create_note(title);
        log::debug!("created note {}", note.id);
        self.notes.push(note.clone());
        self.persist_notes();
        note
    }

    /// Replace the stored note that has the same id. Unknown ids are ignored.
    pub fn update_note(&mut self, note: Note) {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) else {
            log::debug!("ignoring update of missing note {}", note.id);
            return;
        };
        *slot = note;
        self.persist_notes();
    }

    pub fn rename_note(&mut self, id: &str, title: &str) {
        self.edit_note(id, |n| n.title = title.to_string());
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) {
        if self.note(id).is_some_and(|n| n.pinned != pinned) {
            self.edit_note(id, |n| n.pinned = pinned);
        }
    }

    /// Remove a note, strip it from every collection and close it if open.
    pub fn delete_note(&mut self, id: &str) {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return;
        }
        self.persist_notes();

        let mut collections_changed = false;
        for c in self.collections.iter_mut().filter(|c| c.contains(id)) {
            c.notes.retain(|n| n != id);
            c.touch();
            collections_changed = true;
        }
        if collections_changed {
            self.persist_collections();
        }

        if self.current_note_id.as_deref() == Some(id) {
            self.current_note_id = None;
        }
        log::debug!("deleted note {id}");
    }

    // --- Collections ---

    pub fn create_collection(&mut self, title: &str, description: Option<&str>) -> NoteCollection {
        let ts = now();
        let collection = NoteCollection {
            id: generate_id(),
            title: title.to_string(),
            emoji: None,
            cover_image: None,
            description: description.map(str::to_string),
            notes: vec![],
            created_at: ts,
            updated_at: ts,
            pinned: false,
        };
        self.collections.push(collection.clone());
        self.persist_collections();
        collection
    }

    pub fn update_collection(&mut self, collection: NoteCollection) {
        let Some(slot) = self.collections.iter_mut().find(|c| c.id == collection.id) else {
            log::debug!("ignoring update of missing collection {}", collection.id);
            return;
        };
        *slot = collection;
        self.persist_collections();
    }

    pub fn delete_collection(&mut self, id: &str) {
        let before = self.collections.len();
        self.collections.retain(|c| c.id != id);
        if self.collections.len() != before {
            self.persist_collections();
        }
    }

    /// Add a note to a collection. Unknown ids and existing members are ignored.
    pub fn add_note_to_collection(&mut self, note_id: &str, collection_id: &str) {
        if self.note(note_id).is_none() {
            return;
        }
        let Some(c) = self.collections.iter_mut().find(|c| c.id == collection_id) else {
            return;
        };
        if c.contains(note_id) {
            return;
        }
        c.notes.push(note_id.to_string());
        c.touch();
        self.persist_collections();
    }

    pub fn remove_note_from_collection(&mut self, note_id: &str, collection_id: &str) {
        let Some(c) = self
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id && c.contains(note_id))
        else {
            return;
        };
        c.notes.retain(|n| n != note_id);
        c.touch();
        self.persist_collections();
    }

    // --- Blocks of the open note ---

    /// Add an empty block of `kind` to the open note and return its id.
    pub fn add_block(&mut self, kind: BlockType, after: Option<&str>) -> Option<String> {
        let (next, id) = blocks::add_block(self.current_note()?, kind, after);
        self.update_note(next);
        Some(id)
    }

    pub fn update_block(&mut self, block_id: &str, content: &str) {
        self.edit_current(|n| blocks::update_content(n, block_id, content));
    }

    pub fn change_block(&mut self, block_id: &str, kind: BlockType) {
        self.edit_current(|n| blocks::change_type(n, block_id, kind));
    }

    pub fn remove_block(&mut self, block_id: &str) {
        self.edit_current(|n| blocks::delete_block(n, block_id));
    }

    pub fn move_block(&mut self, block_id: &str, direction: MoveDirection) {
        self.edit_current(|n| blocks::move_block(n, block_id, direction));
    }

    pub fn toggle_todo(&mut self, block_id: &str) {
        self.edit_current(|n| blocks::toggle_checked(n, block_id));
    }

    // --- Preferences ---

    pub fn update_preferences(&mut self, edit: impl FnOnce(&mut UserPreferences)) {
        let mut next = self.preferences.clone();
        edit(&mut next);
        if next == self.preferences {
            return;
        }
        self.preferences = next;
        let result = self.persistence.save_preferences(&self.preferences);
        self.record(result);
    }

    pub fn toggle_sidebar(&mut self) {
        self.update_preferences(|p| p.sidebar_collapsed = !p.sidebar_collapsed);
    }

    // --- Internals ---

    fn edit_current(&mut self, transform: impl FnOnce(&Note) -> Note) {
        let Some(current) = self.current_note() else {
            return;
        };
        let next = transform(current);
        if &next != current {
            self.update_note(next);
        }
    }

    fn edit_note(&mut self, id: &str, edit: impl FnOnce(&mut Note)) {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return;
        };
        edit(note);
        note.touch();
        self.persist_notes();
    }

    fn persist_notes(&mut self) {
        let result = self.persistence.save_notes(&self.notes);
        self.record(result);
    }

    fn persist_collections(&mut self) {
        let result = self.persistence.save_collections(&self.collections);
        self.record(result);
    }

    fn record(&mut self, result: Result<(), StorageError>) {
        if let Err(e) = result {
            log::error!("{e}");
            self.last_storage_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;
    use crate::storage::MemoryStore;

    fn empty_store() -> NotesStore<MemoryStore> {
        NotesStore::open(MemoryStore::new(), StorageKeys::default(), false)
    }

    fn store_with_open_note() -> (NotesStore<MemoryStore>, String) {
        let mut store = empty_store();
        let note = store.create_note(Some("Draft"));
        store.set_current_note(Some(&note.id));
        (store, note.id)
    }

    #[test]
    fn test_open_seeds_and_loads_samples() {
        let store = NotesStore::open(MemoryStore::new(), StorageKeys::default(), true);
        assert_eq!(store.notes().len(), 3);
        assert_eq!(store.collections().len(), 2);
        assert!(store.current_note().is_none());
        assert!(store.last_storage_error().is_none());
    }

    #[test]
    fn test_open_without_seed_starts_empty() {
        let store = empty_store();
        assert!(store.notes().is_empty());
        assert!(store.collections().is_empty());
        assert_eq!(store.preferences(), &UserPreferences::default());
    }

    #[test]
    fn test_create_note_persists() {
        let mem = MemoryStore::new();
        let mut store = NotesStore::open(&mem, StorageKeys::default(), false);
        let note = store.create_note(None);
        assert_eq!(note.title, "Untitled");

        let reopened = NotesStore::open(&mem, StorageKeys::default(), false);
        assert_eq!(reopened.notes(), &[note]);
    }

    #[test]
    fn test_set_current_note_resolves_by_id() {
        let mut store = empty_store();
        let a = store.create_note(Some("A"));
        store.set_current_note(Some(&a.id));
        assert_eq!(store.current_note_id(), Some(a.id.as_str()));

        store.set_current_note(Some("missing"));
        assert!(store.current_note().is_none());

        store.set_current_note(Some(&a.id));
        store.set_current_note(None);
        assert!(store.current_note().is_none());
    }

    #[test]
    fn test_block_ops_without_open_note_are_noops() {
        let mut store = empty_store();
        let note = store.create_note(None);
        let block_id = note.blocks[0].id.clone();

        assert!(store.add_block(BlockType::Quote, None).is_none());
        store.update_block(&block_id, "text");
        store.remove_block(&block_id);
        assert_eq!(store.notes(), &[note]);
    }

    #[test]
    fn test_block_edits_keep_list_and_current_note_in_sync() {
        let (mut store, note_id) = store_with_open_note();
        let first = store.current_note().map(|n| n.blocks[0].id.clone()).unwrap_or_default();

        let heading = store
            .add_block(BlockType::Heading1, Some(&first))
            .expect("note is open");
        store.update_block(&heading, "Project Ideas");
        store.move_block(&heading, MoveDirection::Up);

        let current = store.current_note().cloned().expect("note is open");
        assert_eq!(store.note(&note_id), Some(&current));
        assert_eq!(current.blocks[0].id, heading);
        assert_eq!(current.blocks[0].content, "Project Ideas");

        let persisted = store.persistence().load_notes();
        assert_eq!(persisted, vec![current]);
    }

    #[test]
    fn test_add_block_updates_timestamp() {
        let (mut store, _) = store_with_open_note();
        let before = store.current_note().map(|n| n.updated_at).expect("note is open");
        store.add_block(BlockType::Heading1, None);
        let after = store.current_note().map(|n| n.updated_at).expect("note is open");
        assert!(after > before);
    }

    #[test]
    fn test_change_and_remove_block() {
        let (mut store, _) = store_with_open_note();
        let id = store.add_block(BlockType::Paragraph, None).expect("note is open");

        store.change_block(&id, BlockType::Code);
        let kind = store
            .current_note()
            .and_then(|n| blocks::find_block(n, &id))
            .map(|b| b.block_type());
        assert_eq!(kind, Some(BlockType::Code));

        store.remove_block(&id);
        store.remove_block(&id);
        assert_eq!(store.current_note().map(|n| n.blocks.len()), Some(1));
    }

    #[test]
    fn test_toggle_todo_twice() {
        let (mut store, _) = store_with_open_note();
        let id = store.add_block(BlockType::ToDo, None).expect("note is open");

        let checked = |s: &NotesStore<MemoryStore>| {
            s.current_note()
                .and_then(|n| blocks::find_block(n, &id))
                .map(|b| b.kind.clone())
        };

        store.toggle_todo(&id);
        assert_eq!(checked(&store), Some(BlockKind::ToDo { checked: true }));
        store.toggle_todo(&id);
        assert_eq!(checked(&store), Some(BlockKind::ToDo { checked: false }));
    }

    #[test]
    fn test_rename_and_pin() {
        let (mut store, id) = store_with_open_note();
        let before = store.note(&id).map(|n| n.updated_at).expect("note exists");

        store.rename_note(&id, "Final");
        store.set_pinned(&id, true);

        let note = store.note(&id).expect("note exists");
        assert_eq!(note.title, "Final");
        assert!(note.pinned);
        assert!(note.updated_at > before);
        assert_eq!(store.current_note().map(|n| n.title.as_str()), Some("Final"));
    }

    #[test]
    fn test_update_note_ignores_unknown_id() {
        let mut store = empty_store();
        let stray = blocks::create_note(Some("Stray"));
        store.update_note(stray);
        assert!(store.notes().is_empty());
    }

    #[test]
    fn test_delete_note_cascades_into_collections() {
        let mut store = empty_store();
        let note = store.create_note(Some("Shared"));
        let other = store.create_note(Some("Other"));
        let a = store.create_collection("A", None);
        let b = store.create_collection("B", Some("second"));

        store.add_note_to_collection(&note.id, &a.id);
        store.add_note_to_collection(&note.id, &b.id);
        store.add_note_to_collection(&other.id, &b.id);
        store.set_current_note(Some(&note.id));

        store.delete_note(&note.id);

        assert!(store.note(&note.id).is_none());
        assert!(store.current_note().is_none());
        for c in store.collections() {
            assert!(!c.contains(&note.id));
        }
        assert_eq!(
            store.collection(&b.id).map(|c| c.notes.clone()),
            Some(vec![other.id.clone()])
        );

        let persisted = store.persistence().load_collections();
        assert!(persisted.iter().all(|c| !c.contains(&note.id)));
    }

    #[test]
    fn test_delete_other_note_keeps_current() {
        let (mut store, id) = store_with_open_note();
        let other = store.create_note(None);
        store.delete_note(&other.id);
        assert_eq!(store.current_note_id(), Some(id.as_str()));
    }

    #[test]
    fn test_collection_membership_has_no_duplicates() {
        let mut store = empty_store();
        let note = store.create_note(None);
        let c = store.create_collection("Reading", None);

        store.add_note_to_collection(&note.id, &c.id);
        let after_first = store.collection(&c.id).cloned().expect("collection exists");
        store.add_note_to_collection(&note.id, &c.id);
        assert_eq!(store.collection(&c.id), Some(&after_first));

        store.add_note_to_collection("missing", &c.id);
        assert_eq!(store.collection(&c.id).map(|c| c.notes.len()), Some(1));

        store.remove_note_from_collection(&note.id, &c.id);
        assert_eq!(store.collection(&c.id).map(|c| c.notes.len()), Some(0));
    }

    #[test]
    fn test_update_and_delete_collection() {
        let mut store = empty_store();
        let mut c = store.create_collection("Draft", None);
        c.title = "Renamed".to_string();
        store.update_collection(c.clone());
        assert_eq!(store.collection(&c.id).map(|c| c.title.as_str()), Some("Renamed"));

        store.delete_collection(&c.id);
        assert!(store.collections().is_empty());
        assert!(store.persistence().load_collections().is_empty());
    }

    #[test]
    fn test_preferences_persist() {
        let mem = MemoryStore::new();
        let mut store = NotesStore::open(&mem, StorageKeys::default(), false);
        store.toggle_sidebar();
        assert!(store.preferences().sidebar_collapsed);

        let reopened = NotesStore::open(&mem, StorageKeys::default(), false);
        assert!(reopened.preferences().sidebar_collapsed);
    }

    #[test]
    fn test_write_failure_is_recorded_and_state_kept() {
        let mem = MemoryStore::new();
        let mut store = NotesStore::open(&mem, StorageKeys::default(), false);
        mem.set_simulate_write_error(true);

        let note = store.create_note(Some("Unsaved"));
        assert_eq!(store.note(&note.id), Some(&note));
        assert!(matches!(
            store.last_storage_error(),
            Some(StorageError::Write { .. })
        ));

        store.clear_storage_error();
        assert!(store.last_storage_error().is_none());
    }
}
