use crate::config::AppConfig;
use crate::editor::NoteEditor;
use crate::models::Theme;
use crate::pages::{Sidebar, StorageErrorBanner, StructurePanel};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    log::debug!("starting with {config:?}");

    let state = AppState::new(&config);
    provide_context(AppContext(state));

    let dark = Memo::new(move |_| state.store.with(|s| s.preferences().theme == Theme::Dark));

    // No router: the open note lives in the store, not in the URL.
    view! {
        <div class="flex min-h-screen bg-background text-foreground" class:dark=move || dark.get()>
            <Sidebar />
            <main class="flex h-screen min-w-0 flex-1 flex-col overflow-y-auto">
                <StorageErrorBanner />
                <NoteEditor />
            </main>
            <StructurePanel />
        </div>
    }
}
