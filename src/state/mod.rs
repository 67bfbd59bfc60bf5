mod selectors;
mod store;

pub use selectors::{collection_notes, filter_by_title, pinned_notes, recent_notes, RECENT_LIMIT};
pub use store::NotesStore;

use crate::config::AppConfig;
use crate::storage::BrowserStorage;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    /// Notes, collections and preferences, backed by `localStorage`.
    pub store: RwSignal<NotesStore<BrowserStorage>>,

    /// Block that receives keyboard focus and anchors "add block".
    pub selected_block_id: RwSignal<Option<String>>,

    /// Sidebar search query.
    pub search_query: RwSignal<String>,

    pub structure_collapsed: RwSignal<bool>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let store = NotesStore::open(
            BrowserStorage,
            config.storage_keys(),
            config.seed_sample_data,
        );

        Self {
            store: RwSignal::new(store),
            selected_block_id: RwSignal::new(None),
            search_query: RwSignal::new(String::new()),
            structure_collapsed: RwSignal::new(true),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// The app state provided by `App`.
///
/// Panics when called outside the `App` component tree: that is a wiring bug,
/// not a data problem.
pub(crate) fn use_notes() -> AppState {
    expect_context::<AppContext>().0
}
