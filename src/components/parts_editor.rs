//! Parts Editor Component
//!
//! Row editor for part-number/quantity pairs, with a paste box that
//! accepts free-form lists.

use composer_core::{smart_parse_parts, PartRow, PartsEditor as PartsRows};
use leptos::prelude::*;

use crate::compose::schedule_live_preview;
use crate::context::AppContext;
use crate::store::{use_app_store, AppStore};

fn edit_parts(ctx: AppContext, store: AppStore, field_key: StoredValue<String>, f: impl FnOnce(&mut PartsRows)) {
    ctx.update_form(|form| field_key.with_value(|k| form.update_parts(k, f)));
    schedule_live_preview(ctx, store);
}

/// Editor for the parts field named by `field_key`
#[component]
pub fn PartsEditor(field_key: StoredValue<String>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let (paste_text, set_paste_text) = signal(String::new());

    let row_count = Memo::new(move |_| {
        ctx.form.with(|f| {
            f.as_ref()
                .and_then(|f| field_key.with_value(|k| f.parts(k).map(|p| p.rows().len())))
                .unwrap_or(0)
        })
    });
    let serialized = move || {
        ctx.form.with(|f| {
            f.as_ref()
                .map(|f| field_key.with_value(|k| f.value(k).to_string()))
                .unwrap_or_default()
        })
    };

    let add_pasted = move |_| {
        let parsed: Vec<PartRow> = smart_parse_parts(&paste_text.get_untracked());
        if parsed.is_empty() {
            return;
        }
        log::debug!("pasted {} part rows", parsed.len());
        edit_parts(ctx, store, field_key, |rows| rows.append(parsed));
        set_paste_text.set(String::new());
    };

    view! {
        <div class="parts-editor">
            <input type="hidden" name=move || field_key.get_value() prop:value=serialized />
            <div class="parts-rows">
                <For
                    each=move || 0..row_count.get()
                    key=|index| *index
                    children=move |index| view! { <PartRowInputs field_key=field_key index=index /> }
                />
            </div>
            <button
                type="button"
                class="parts-add-btn"
                on:click=move |_| edit_parts(ctx, store, field_key, PartsRows::add_row)
            >
                "+ Add part"
            </button>
            <details class="parts-paste">
                <summary>"Paste a list"</summary>
                <textarea
                    rows="4"
                    placeholder="ABC-123 x 2\nXYZ-9, 4\nQ-77 (3)"
                    prop:value=move || paste_text.get()
                    on:input=move |ev| set_paste_text.set(event_target_value(&ev))
                ></textarea>
                <button type="button" class="parts-paste-btn" on:click=add_pasted>
                    "Add lines"
                </button>
            </details>
        </div>
    }
}

/// Inputs for one row; values are read back from the form
#[component]
fn PartRowInputs(field_key: StoredValue<String>, index: usize) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let row = move || {
        ctx.form.with(|f| {
            f.as_ref()
                .and_then(|f| field_key.with_value(|k| f.parts(k).and_then(|p| p.rows().get(index).cloned())))
                .unwrap_or_default()
        })
    };
    view! {
        <div class="parts-row">
            <input
                type="text"
                class="parts-number"
                placeholder="Part number"
                prop:value=move || row().part_number
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    edit_parts(ctx, store, field_key, |rows| rows.set_part_number(index, &text));
                }
            />
            <input
                type="text"
                inputmode="numeric"
                class="parts-qty"
                placeholder="Qty"
                prop:value=move || row().quantity
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    edit_parts(ctx, store, field_key, |rows| rows.set_quantity(index, &text));
                }
            />
            <button
                type="button"
                class="parts-remove-btn"
                on:click=move |_| edit_parts(ctx, store, field_key, |rows| rows.remove_row(index))
            >
                "×"
            </button>
        </div>
    }
}
