use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Text input that renders `value` and reports edits through `on_input`.
///
/// `on_commit` fires on blur with the final text. Keystrokes that should not
/// persist on every change only need `on_commit`.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(into, optional)] on_input: Option<Callback<String>>,
    #[prop(into, optional)] on_commit: Option<Callback<String>>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none",
        "focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50",
        class
    );

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            prop:value=move || value.get()
            node_ref=node_ref
            on:input=move |ev| {
                if let Some(cb) = on_input {
                    cb.run(event_target_value(&ev));
                }
            }
            on:blur=move |ev| {
                if let Some(cb) = on_commit {
                    cb.run(event_target_value(&ev));
                }
            }
        />
    }
}
