use crate::components::ui::{Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Input};
use crate::models::Note;
use crate::outline::{collapsed_outline, outline, OutlineEntry, COLLAPSED_LIMIT};
use crate::state::{collection_notes, pinned_notes, recent_notes, use_notes, RECENT_LIMIT};
use icons::{ChevronRight, X};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Global keyboard shortcuts handled by the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shortcut {
    ToggleSidebar,
    FocusSearch,
    BlurSearch,
}

/// Cmd/Ctrl+B toggles the sidebar and Cmd/Ctrl+K focuses search.
/// While an input has focus only Escape is taken.
pub(crate) fn shortcut_for(key: &str, modifier: bool, in_text_field: bool) -> Option<Shortcut> {
    let key = key.to_lowercase();
    if key == "escape" {
        return Some(Shortcut::BlurSearch);
    }
    if in_text_field || !modifier {
        return None;
    }
    match key.as_str() {
        "b" => Some(Shortcut::ToggleSidebar),
        "k" => Some(Shortcut::FocusSearch),
        _ => None,
    }
}

/// `(id, label)` rows for the sidebar lists.
fn note_rows(notes: Vec<&Note>) -> Vec<(String, String)> {
    notes
        .into_iter()
        .map(|n| {
            let label = match &n.emoji {
                Some(emoji) => format!("{emoji} {}", n.title),
                None => n.title.clone(),
            };
            (n.id.clone(), label)
        })
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let search_query = app.search_query;
    let search_ref: NodeRef<html::Input> = NodeRef::new();

    let collapsed = Memo::new(move |_| store.with(|s| s.preferences().sidebar_collapsed));
    let theme = Memo::new(move |_| store.with(|s| s.preferences().theme));

    let on_toggle_sidebar = move |_| store.update(|s| s.toggle_sidebar());

    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let in_text_field = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| {
                let tag = el.tag_name().to_lowercase();
                tag == "input" || tag == "textarea" || tag == "select"
            })
            .unwrap_or(false);

        match shortcut_for(&ev.key(), ev.meta_key() || ev.ctrl_key(), in_text_field) {
            Some(Shortcut::ToggleSidebar) => {
                ev.prevent_default();
                store.update(|s| s.toggle_sidebar());
            }
            Some(Shortcut::FocusSearch) => {
                ev.prevent_default();
                if collapsed.get_untracked() {
                    store.update(|s| s.toggle_sidebar());
                }
                if let Some(input) = search_ref.get_untracked() {
                    let _ = input.focus();
                }
            }
            Some(Shortcut::BlurSearch) => {
                if let Some(input) = search_ref.get_untracked() {
                    let _ = input.blur();
                }
            }
            None => {}
        }
    });

    let on_new_note = move |_| {
        store.update(|s| {
            let note = s.create_note(None);
            s.set_current_note(Some(&note.id));
        });
        app.selected_block_id.set(None);
    };

    let on_theme = move |_| store.update(|s| s.update_preferences(|p| p.theme = p.theme.next()));

    let pinned = Memo::new(move |_| {
        let q = search_query.get();
        store.with(|s| note_rows(pinned_notes(s.notes(), &q)))
    });
    let recent = Memo::new(move |_| {
        let q = search_query.get();
        store.with(|s| note_rows(recent_notes(s.notes(), &q, RECENT_LIMIT)))
    });

    view! {
        <aside class=move || {
            format!(
                "{} flex h-screen shrink-0 flex-col gap-4 overflow-y-auto border-r border-border bg-muted/30 p-3",
                if collapsed.get() { "w-14" } else { "w-64" },
            )
        }>
            <div class="flex items-center justify-between">
                <Show when=move || !collapsed.get()>
                    <span class="text-sm font-semibold">"Creative Notes"</span>
                </Show>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Icon
                    on:click=on_toggle_sidebar
                    attr:title="Toggle sidebar"
                >
                    {move || {
                        if collapsed.get() {
                            view! { <ChevronRight class="size-4" /> }.into_any()
                        } else {
                            view! { <ChevronRight class="size-4 rotate-180" /> }.into_any()
                        }
                    }}
                </Button>
            </div>

            <Show when=move || !collapsed.get()>
                <Input
                    node_ref=search_ref
                    r#type="search"
                    placeholder="Search notes..."
                    class="h-8"
                    value=search_query
                    on_input=Callback::new(move |q: String| search_query.set(q))
                />

                <Button variant=ButtonVariant::Default size=ButtonSize::Sm class="w-full" on:click=on_new_note>
                    "+ New Note"
                </Button>

                <NoteSection title="Pinned" rows=pinned />
                <NoteSection title="Recent" rows=recent />
                <CollectionsSection />

                <div class="mt-auto flex items-center justify-between text-xs text-muted-foreground">
                    <span>{move || format!("Theme: {}", theme.get())}</span>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Xs on:click=on_theme>"Switch"</Button>
                </div>
            </Show>
        </aside>
    }
}

#[component]
fn NoteSection(title: &'static str, rows: Memo<Vec<(String, String)>>) -> impl IntoView {
    view! {
        <Show when=move || !rows.get().is_empty()>
            <section class="space-y-1">
                <div class="px-2 text-xs font-medium uppercase tracking-wide text-muted-foreground">{title}</div>
                <For each=move || rows.get() key=|row| row.clone() let:row>
                    <NoteLink note_id=row.0 label=row.1 />
                </For>
            </section>
        </Show>
    }
}

#[component]
fn NoteLink(note_id: String, label: String) -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let id_sv = StoredValue::new(note_id);

    let active = Memo::new(move |_| {
        store.with(|s| s.current_note_id() == Some(id_sv.get_value().as_str()))
    });

    let on_open = move |_| {
        let id = id_sv.get_value();
        store.update(|s| s.set_current_note(Some(&id)));
        app.selected_block_id.set(None);
    };

    view! {
        <button
            class=move || {
                format!(
                    "block w-full truncate rounded-md px-2 py-1 text-left text-sm transition-colors hover:bg-accent {}",
                    if active.get() { "bg-accent font-medium text-foreground" } else { "text-muted-foreground" },
                )
            }
            on:click=on_open
        >
            {label}
        </button>
    }
}

#[component]
fn CollectionsSection() -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let new_title = RwSignal::new(String::new());

    let ids = Memo::new(move |_| {
        store.with(|s| s.collections().iter().map(|c| c.id.clone()).collect::<Vec<_>>())
    });

    let create = move || {
        let title = new_title.get_untracked();
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        store.update(|s| {
            s.create_collection(title, None);
        });
        new_title.set(String::new());
    };

    view! {
        <section class="space-y-2">
            <div class="px-2 text-xs font-medium uppercase tracking-wide text-muted-foreground">"Collections"</div>
            <For each=move || ids.get() key=|id| id.clone() let:collection_id>
                <CollectionItem collection_id=collection_id />
            </For>
            <form
                class="flex items-center gap-1"
                on:submit=move |ev: web_sys::SubmitEvent| {
                    ev.prevent_default();
                    create();
                }
            >
                <Input
                    class="h-7 text-xs"
                    placeholder="New collection"
                    value=new_title
                    on_input=Callback::new(move |v: String| new_title.set(v))
                />
                <Button variant=ButtonVariant::Outline size=ButtonSize::Xs on:click=move |_| create()>"Add"</Button>
            </form>
        </section>
    }
}

#[component]
fn CollectionItem(collection_id: String) -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let id_sv = StoredValue::new(collection_id);

    let title = Memo::new(move |_| {
        let id = id_sv.get_value();
        store.with(|s| s.collection(&id).map(|c| c.title.clone()).unwrap_or_default())
    });
    let members = Memo::new(move |_| {
        let id = id_sv.get_value();
        store.with(|s| {
            s.collection(&id)
                .map(|c| note_rows(collection_notes(s.notes(), c)))
                .unwrap_or_default()
        })
    });

    let on_delete = move |_| {
        let id = id_sv.get_value();
        store.update(|s| s.delete_collection(&id));
    };

    view! {
        <div class="group space-y-0.5">
            <div class="flex items-center justify-between px-2 text-sm">
                <span class="truncate font-medium">{move || title.get()}</span>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Xs
                    class="invisible group-hover:visible"
                    attr:title="Delete collection"
                    on:click=on_delete
                >
                    <X class="size-3" />
                </Button>
            </div>
            <For each=move || members.get() key=|row| row.clone() let:row>
                <MemberRow collection_id=id_sv note_id=row.0 label=row.1 />
            </For>
        </div>
    }
}

#[component]
fn MemberRow(collection_id: StoredValue<String>, note_id: String, label: String) -> impl IntoView {
    let store = use_notes().store;
    let note_sv = StoredValue::new(note_id.clone());

    let on_remove = move |_| {
        let collection_id = collection_id.get_value();
        let note_id = note_sv.get_value();
        store.update(|s| s.remove_note_from_collection(&note_id, &collection_id));
    };

    view! {
        <div class="flex items-center pl-2">
            <NoteLink note_id=note_id label=label />
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Xs
                attr:title="Remove from collection"
                on:click=on_remove
            >
                <X class="size-3" />
            </Button>
        </div>
    }
}

/// Right-hand outline of the open note.
#[component]
pub fn StructurePanel() -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let collapsed = app.structure_collapsed;

    let rows = Memo::new(move |_| {
        let collapsed = collapsed.get();
        store.with(|s| {
            s.current_note().map(|n| {
                if collapsed {
                    collapsed_outline(n, COLLAPSED_LIMIT)
                } else {
                    (outline(n), 0)
                }
            })
        })
    });

    view! {
        <Show when=move || rows.with(|r| r.is_some())>
            <aside class="hidden h-screen w-56 shrink-0 flex-col gap-2 overflow-y-auto border-l border-border p-3 lg:flex">
                <div class="flex items-center justify-between">
                    <span class="text-xs font-medium uppercase tracking-wide text-muted-foreground">"Structure"</span>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Xs on:click=move |_| collapsed.update(|c| *c = !*c)>
                        {move || if collapsed.get() { "Expand" } else { "Collapse" }}
                    </Button>
                </div>
                <For
                    each=move || rows.get().map(|(entries, _)| entries).unwrap_or_default()
                    key=|entry| entry.clone()
                    let:entry
                >
                    <OutlineRow entry=entry />
                </For>
                {move || {
                    let hidden = rows.get().map(|(_, hidden)| hidden).unwrap_or(0);
                    (hidden > 0).then(|| view! {
                        <div class="px-2 text-xs text-muted-foreground">{format!("+{hidden} more")}</div>
                    })
                }}
            </aside>
        </Show>
    }
}

#[component]
fn OutlineRow(entry: OutlineEntry) -> impl IntoView {
    let app = use_notes();
    let OutlineEntry { block_id, block_type, label } = entry;
    let id_sv = StoredValue::new(block_id);

    view! {
        <button
            class="flex w-full items-center gap-2 truncate rounded-md px-2 py-1 text-left text-xs hover:bg-accent"
            on:click=move |_| app.selected_block_id.set(Some(id_sv.get_value()))
        >
            <span class="w-6 shrink-0 text-muted-foreground">{block_type.glyph()}</span>
            <span class="truncate">{label}</span>
        </button>
    }
}

/// Non-fatal notice for the last failed storage write.
#[component]
pub fn StorageErrorBanner() -> impl IntoView {
    let store = use_notes().store;
    let message = Memo::new(move |_| store.with(|s| s.last_storage_error().map(|e| e.to_string())));

    view! {
        {move || {
            message.get().map(|e| view! {
                <Alert class="border-destructive/30">
                    <AlertDescription class="text-destructive">
                        {format!("Changes could not be saved: {e}")}
                    </AlertDescription>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Xs
                        attr:title="Dismiss"
                        on:click=move |_| store.update(|s| s.clear_storage_error())
                    >
                        <X class="size-4" />
                    </Button>
                </Alert>
            })
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sample_notes;

    #[test]
    fn test_shortcuts_need_modifier() {
        assert_eq!(shortcut_for("b", true, false), Some(Shortcut::ToggleSidebar));
        assert_eq!(shortcut_for("K", true, false), Some(Shortcut::FocusSearch));
        assert_eq!(shortcut_for("b", false, false), None);
        assert_eq!(shortcut_for("x", true, false), None);
    }

    #[test]
    fn test_shortcuts_while_typing() {
        assert_eq!(shortcut_for("b", true, true), None);
        assert_eq!(shortcut_for("Escape", false, true), Some(Shortcut::BlurSearch));
    }

    #[test]
    fn test_note_rows_prefix_emoji() {
        let mut notes = sample_notes();
        notes[1].emoji = Some("💡".to_string());
        let rows = note_rows(notes.iter().skip(1).take(1).collect());
        assert_eq!(rows, vec![(notes[1].id.clone(), "💡 Project Ideas".to_string())]);
    }
}
