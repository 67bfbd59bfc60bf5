use crate::blocks::find_block;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::models::{Block, BlockType, MoveDirection};
use crate::state::{use_notes, AppState};
use icons::{ChevronDown, ChevronUp, X};
use leptos::html;
use leptos::prelude::*;
use std::str::FromStr;

/// What a key press inside a block's input asks the editor to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockKeyAction {
    AddBelow,
    Move(MoveDirection),
    Delete,
}

/// Map a key press to a block action.
///
/// `modifier` is Ctrl or Cmd. Shift+Enter is left to the input. Backspace only
/// deletes a block that is already empty.
pub(crate) fn block_key_action(
    key: &str,
    modifier: bool,
    shift: bool,
    content_is_empty: bool,
) -> Option<BlockKeyAction> {
    match key {
        "Enter" if !shift && !modifier => Some(BlockKeyAction::AddBelow),
        "ArrowUp" if modifier => Some(BlockKeyAction::Move(MoveDirection::Up)),
        "ArrowDown" if modifier => Some(BlockKeyAction::Move(MoveDirection::Down)),
        "Backspace" if modifier && content_is_empty => Some(BlockKeyAction::Delete),
        _ => None,
    }
}

/// Position of a numbered-list block within its run of consecutive numbered items (1-based).
pub(crate) fn list_number(blocks: &[Block], block_id: &str) -> Option<usize> {
    let idx = blocks.iter().position(|b| b.id == block_id)?;
    if blocks[idx].block_type() != BlockType::NumberedList {
        return None;
    }
    let run = blocks[..idx]
        .iter()
        .rev()
        .take_while(|b| b.block_type() == BlockType::NumberedList)
        .count();
    Some(run + 1)
}

pub(crate) fn block_text_class(kind: BlockType) -> &'static str {
    match kind {
        BlockType::Heading1 => "text-3xl font-bold tracking-tight",
        BlockType::Heading2 => "text-2xl font-semibold tracking-tight",
        BlockType::Heading3 => "text-xl font-semibold",
        BlockType::Quote => "italic text-muted-foreground",
        BlockType::Code => "font-mono text-sm",
        _ => "text-base",
    }
}

fn block_frame_class(kind: BlockType) -> &'static str {
    match kind {
        BlockType::Quote => "border-l-4 border-border pl-4",
        BlockType::Code => "rounded-md bg-muted px-3 py-2",
        _ => "",
    }
}

#[component]
pub fn NoteEditor() -> impl IntoView {
    let app = use_notes();
    let has_note = Memo::new(move |_| app.store.with(|s| s.current_note().is_some()));

    view! {
        <Show when=move || has_note.get() fallback=|| view! { <EmptyEditor /> }>
            <OpenNote />
        </Show>
    }
}

#[component]
fn EmptyEditor() -> impl IntoView {
    let app = use_notes();

    let on_create = move |_| {
        let id = app.store.try_update(|s| {
            let note = s.create_note(None);
            s.set_current_note(Some(&note.id));
            note.id
        });
        log::debug!("opened new note {id:?}");
        app.selected_block_id.set(None);
    };

    view! {
        <div class="flex h-full flex-col items-center justify-center gap-4 text-center">
            <div class="text-lg font-medium">"No note selected"</div>
            <p class="max-w-sm text-sm text-muted-foreground">
                "Pick a note from the sidebar or start a new one."
            </p>
            <Button on:click=on_create>"Create New Note"</Button>
        </div>
    }
}

#[component]
fn OpenNote() -> impl IntoView {
    let app = use_notes();
    let store = app.store;

    let note_id = Memo::new(move |_| {
        store.with(|s| s.current_note_id().map(str::to_string).unwrap_or_default())
    });
    let title = Signal::derive(move || {
        store.with(|s| s.current_note().map(|n| n.title.clone()).unwrap_or_default())
    });
    let pinned = Memo::new(move |_| store.with(|s| s.current_note().is_some_and(|n| n.pinned)));
    let block_ids = Memo::new(move |_| {
        store.with(|s| {
            s.current_note()
                .map(|n| n.blocks.iter().map(|b| b.id.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    });
    let font_scale = Memo::new(move |_| store.with(|s| s.preferences().font_scale));

    let on_title = Callback::new(move |value: String| {
        let id = note_id.get_untracked();
        store.update(|s| s.rename_note(&id, &value));
    });

    let on_pin = move |_| {
        let id = note_id.get_untracked();
        let next = !pinned.get_untracked();
        store.update(|s| s.set_pinned(&id, next));
    };

    let on_delete = move |_| {
        let id = note_id.get_untracked();
        store.update(|s| s.delete_note(&id));
        app.selected_block_id.set(None);
    };

    view! {
        <div class="mx-auto flex w-full max-w-3xl flex-col gap-4 px-8 py-10" style=move || format!("font-size: {}rem", font_scale.get())>
            <div class="flex items-center gap-2">
                <Input
                    class="h-12 border-none px-0 text-4xl font-bold shadow-none focus-visible:ring-0"
                    placeholder="Untitled"
                    value=title
                    on_input=on_title
                />
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_pin>
                    {move || if pinned.get() { "Unpin" } else { "Pin" }}
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm class="text-destructive" on:click=on_delete>
                    "Delete"
                </Button>
            </div>

            <CollectionPicker note_id=note_id />

            <div class="flex flex-col gap-1">
                <For each=move || block_ids.get() key=|id| id.clone() let:block_id>
                    <BlockView block_id=block_id />
                </For>
            </div>

            <AddBlockMenu />
        </div>
    }
}

/// Select listing the collections the open note can still join.
#[component]
fn CollectionPicker(note_id: Memo<String>) -> impl IntoView {
    let app = use_notes();
    let store = app.store;

    let options = Memo::new(move |_| {
        let id = note_id.get();
        store.with(|s| {
            s.collections()
                .iter()
                .filter(|c| !c.contains(&id))
                .map(|c| (c.id.clone(), c.title.clone()))
                .collect::<Vec<_>>()
        })
    });

    let on_change = move |ev: web_sys::Event| {
        let collection_id = event_target_value(&ev);
        if collection_id.is_empty() {
            return;
        }
        let id = note_id.get_untracked();
        store.update(|s| s.add_note_to_collection(&id, &collection_id));
    };

    view! {
        <Show when=move || !options.get().is_empty()>
            <select
                class="w-fit rounded-md border border-input bg-transparent px-2 py-1 text-xs text-muted-foreground"
                on:change=on_change
            >
                <option value="" selected=true>"Add to collection..."</option>
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|(id, title)| view! { <option value=id>{title}</option> })
                        .collect_view()
                }}
            </select>
        </Show>
    }
}

#[component]
fn AddBlockMenu() -> impl IntoView {
    let app = use_notes();
    let open = RwSignal::new(false);

    let add = move |kind: BlockType| {
        let anchor = app.selected_block_id.get_untracked();
        let added = app
            .store
            .try_update(|s| s.add_block(kind, anchor.as_deref()))
            .flatten();
        if added.is_some() {
            app.selected_block_id.set(added);
        }
        open.set(false);
    };

    view! {
        <div class="flex flex-col gap-2">
            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm class="text-muted-foreground" on:click=move |_| open.update(|o| *o = !*o)>
                "+ Add block"
            </Button>
            <Show when=move || open.get()>
                <div class="grid grid-cols-3 gap-1 rounded-md border p-2 shadow-xs">
                    {BlockType::menu_items()
                        .into_iter()
                        .map(|kind| {
                            view! {
                                <Button variant=ButtonVariant::Ghost size=ButtonSize::Xs class="justify-start" on:click=move |_| add(kind)>
                                    <span class="w-6 text-muted-foreground">{kind.glyph()}</span>
                                    {kind.display_name()}
                                </Button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

fn commit_content(app: AppState, block_id: &str, content: &str) {
    let changed = app.store.with_untracked(|s| {
        s.current_note()
            .and_then(|n| find_block(n, block_id))
            .is_some_and(|b| b.content != content)
    });
    if changed {
        app.store.update(|s| s.update_block(block_id, content));
    }
}

/// One editable block of the open note.
#[component]
pub fn BlockView(block_id: String) -> impl IntoView {
    let app = use_notes();
    let store = app.store;
    let id_sv = StoredValue::new(block_id);
    let input_ref = NodeRef::<html::Input>::new();

    let block = Memo::new(move |_| {
        let id = id_sv.get_value();
        store.with(|s| s.current_note().and_then(|n| find_block(n, &id)).cloned())
    });
    let kind = Memo::new(move |_| block.get().map(|b| b.block_type()).unwrap_or(BlockType::Paragraph));
    let content = Memo::new(move |_| block.get().map(|b| b.content).unwrap_or_default());
    let checked = Memo::new(move |_| block.get().and_then(|b| b.kind.checked()).unwrap_or(false));
    let number = Memo::new(move |_| {
        let id = id_sv.get_value();
        store.with(|s| s.current_note().and_then(|n| list_number(&n.blocks, &id)))
    });
    let selected = Memo::new(move |_| app.selected_block_id.get() == Some(id_sv.get_value()));

    Effect::new(move |_| {
        if selected.get() {
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
            }
        }
    });

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let value = event_target_value(&ev);
        let Some(action) = block_key_action(
            &ev.key(),
            ev.ctrl_key() || ev.meta_key(),
            ev.shift_key(),
            value.is_empty(),
        ) else {
            return;
        };
        ev.prevent_default();

        let id = id_sv.get_value();
        match action {
            BlockKeyAction::AddBelow => {
                commit_content(app, &id, &value);
                let added = store
                    .try_update(|s| s.add_block(BlockType::Paragraph, Some(&id)))
                    .flatten();
                if added.is_some() {
                    app.selected_block_id.set(added);
                }
            }
            BlockKeyAction::Move(direction) => {
                commit_content(app, &id, &value);
                store.update(|s| s.move_block(&id, direction));
            }
            BlockKeyAction::Delete => {
                store.update(|s| s.remove_block(&id));
                app.selected_block_id.set(None);
            }
        }
    };

    // Blur also fires while the block is being torn down; the id may be gone by then.
    let on_blur = move |ev: web_sys::FocusEvent| {
        let Some(id) = id_sv.try_get_value() else {
            return;
        };
        commit_content(app, &id, &event_target_value(&ev));
    };

    let on_type = move |ev: web_sys::Event| {
        let Ok(next) = BlockType::from_str(&event_target_value(&ev)) else {
            return;
        };
        let id = id_sv.get_value();
        store.update(|s| s.change_block(&id, next));
    };

    let on_toggle = move |_| {
        let id = id_sv.get_value();
        store.update(|s| s.toggle_todo(&id));
    };

    let on_move = move |direction: MoveDirection| {
        let id = id_sv.get_value();
        store.update(|s| s.move_block(&id, direction));
    };

    let on_remove = move |_| {
        let id = id_sv.get_value();
        store.update(|s| s.remove_block(&id));
    };

    let marker = move || match kind.get() {
        BlockType::BulletList => Some("•".to_string()),
        BlockType::NumberedList => number.get().map(|n| format!("{n}.")),
        _ => None,
    };

    let body = move || {
        let kind = kind.get();
        match kind {
            BlockType::Divider => view! { <hr class="my-3 flex-1 border-border" /> }.into_any(),
            _ => {
                let image = move || {
                    let src = content.get();
                    (kind == BlockType::Image && !src.trim().is_empty())
                        .then(|| view! { <img src=src class="mt-2 max-h-96 rounded-md object-contain" alt="" /> })
                };
                view! {
                    <div class=format!("flex-1 {}", block_frame_class(kind))>
                        <input
                            node_ref=input_ref
                            class=move || format!(
                                "w-full bg-transparent outline-none placeholder:text-muted-foreground/60 {} {}",
                                block_text_class(kind),
                                if kind == BlockType::ToDo && checked.get() { "line-through text-muted-foreground" } else { "" },
                            )
                            placeholder=kind.placeholder()
                            prop:value=move || content.get()
                            on:focus=move |_| app.selected_block_id.set(id_sv.try_get_value())
                            on:keydown=on_keydown
                            on:blur=on_blur
                        />
                        {image}
                    </div>
                }
                .into_any()
            }
        }
    };

    view! {
        <div
            class="group flex items-start gap-2 rounded-md px-1 py-0.5 hover:bg-accent/40"
            class:bg-accent=move || selected.get()
            data-block-id=id_sv.get_value()
        >
            <select
                class="invisible w-8 shrink-0 bg-transparent text-xs text-muted-foreground group-hover:visible"
                title="Turn into"
                on:change=on_type
            >
                {move || {
                    let current = kind.get();
                    BlockType::menu_items()
                        .into_iter()
                        .chain(current.is_canvas().then_some(current))
                        .map(|t| {
                            view! {
                                <option value=t.to_string() selected={t == current}>
                                    {t.display_name()}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>

            <Show when=move || kind.get() == BlockType::ToDo>
                <input
                    type="checkbox"
                    class="mt-2 size-4 shrink-0"
                    prop:checked=move || checked.get()
                    on:change=on_toggle
                />
            </Show>
            {move || marker().map(|m| view! { <span class="mt-1 w-6 shrink-0 text-right text-muted-foreground">{m}</span> })}

            {body}

            <div class="invisible flex shrink-0 gap-0.5 group-hover:visible">
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Move up" on:click=move |_| on_move(MoveDirection::Up)>
                    <ChevronUp class="size-4" />
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Move down" on:click=move |_| on_move(MoveDirection::Down)>
                    <ChevronDown class="size-4" />
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Delete block" on:click=on_remove>
                    <X class="size-4" />
                </Button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::create_block;

    #[test]
    fn test_enter_adds_block_below() {
        assert_eq!(
            block_key_action("Enter", false, false, false),
            Some(BlockKeyAction::AddBelow)
        );
        assert_eq!(block_key_action("Enter", false, true, false), None);
        assert_eq!(block_key_action("Enter", true, false, false), None);
    }

    #[test]
    fn test_modifier_arrows_move() {
        assert_eq!(
            block_key_action("ArrowUp", true, false, false),
            Some(BlockKeyAction::Move(MoveDirection::Up))
        );
        assert_eq!(
            block_key_action("ArrowDown", true, true, true),
            Some(BlockKeyAction::Move(MoveDirection::Down))
        );
        assert_eq!(block_key_action("ArrowUp", false, false, false), None);
    }

    #[test]
    fn test_backspace_deletes_only_empty_blocks() {
        assert_eq!(
            block_key_action("Backspace", true, false, true),
            Some(BlockKeyAction::Delete)
        );
        assert_eq!(block_key_action("Backspace", true, false, false), None);
        assert_eq!(block_key_action("Backspace", false, false, true), None);
        assert_eq!(block_key_action("a", true, false, true), None);
    }

    #[test]
    fn test_list_number_restarts_after_other_blocks() {
        let blocks = vec![
            create_block(BlockType::NumberedList, "one"),
            create_block(BlockType::NumberedList, "two"),
            create_block(BlockType::Paragraph, "break"),
            create_block(BlockType::NumberedList, "again"),
        ];
        let numbers = blocks
            .iter()
            .map(|b| list_number(&blocks, &b.id))
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![Some(1), Some(2), None, Some(1)]);
        assert_eq!(list_number(&blocks, "missing"), None);
    }

    #[test]
    fn test_heading_classes_shrink_by_level() {
        assert!(block_text_class(BlockType::Heading1).contains("text-3xl"));
        assert!(block_text_class(BlockType::Heading2).contains("text-2xl"));
        assert!(block_text_class(BlockType::Heading3).contains("text-xl"));
        assert_eq!(block_text_class(BlockType::Paragraph), "text-base");
    }
}
