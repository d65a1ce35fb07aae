//! Field Area Component
//!
//! Renders the active intent's controls, keeps "Other" companions in step
//! with their selects, and submits on Enter.

use composer_core::{plan_fields, Control, FieldSpec, FormState, SelectOption};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::compose::{run_generate, schedule_live_preview};
use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields};

use super::PartsEditor;

const FIRST_CONTROL_SELECTOR: &str =
    ".field-area .field:not([hidden]) input:not([type=hidden]), .field-area .field:not([hidden]) select, .field-area .field:not([hidden]) textarea";

fn focus_first_control() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Ok(Some(element)) = document.query_selector(FIRST_CONTROL_SELECTOR) {
        if let Some(element) = element.dyn_ref::<web_sys::HtmlElement>() {
            let _ = element.focus();
        }
    }
}

/// Field list for the selected intent
#[component]
pub fn FieldArea() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    // Rebuild the form whenever the selection (or the catalog behind it) changes
    Effect::new(move |_| {
        let selected = store.selected().get();
        let plan = plan_fields(&store.catalog().read(), selected.as_deref());
        let defaults = store.defaults().get_untracked();
        let form = plan.map(|plan| {
            let mut form = FormState::new(plan);
            form.apply_defaults(&defaults);
            form
        });
        let has_fields = form.as_ref().is_some_and(|f| !f.fields().is_empty());
        ctx.highlighted.set(Default::default());
        ctx.form.set(form);
        if has_fields {
            spawn_local(async {
                TimeoutFuture::new(0).await;
                focus_first_control();
            });
        }
    });

    // Only re-render the control list when the plan itself changes
    let plan = Memo::new(move |_| ctx.form.with(|f| f.as_ref().map(|f| f.plan().clone())));

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            run_generate(ctx, store);
        }
    };

    view! {
        <section class="field-area" on:keydown=on_keydown>
            {move || match plan.get() {
                None => view! {
                    <p class="field-area-empty">"Pick a message type to start."</p>
                }.into_any(),
                Some(plan) if plan.fields.is_empty() => view! {
                    <p class="field-area-empty">"This message type has no fields."</p>
                }.into_any(),
                Some(plan) => plan.fields.into_iter()
                    .map(|spec| view! { <FieldControl spec=spec /> })
                    .collect_view()
                    .into_any(),
            }}
            <div class="field-area-actions">
                <button
                    type="button"
                    class="generate-btn"
                    disabled=move || ctx.busy.get()
                    on:click=move |_| run_generate(ctx, store)
                >
                    {move || if ctx.busy.get() { "Generating…" } else { "Generate" }}
                </button>
            </div>
        </section>
    }
}

/// One labelled control bound to a form key
#[component]
fn FieldControl(spec: FieldSpec) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let key = StoredValue::new(spec.key.clone());

    let value = move || {
        ctx.form.with(|f| {
            f.as_ref()
                .map(|f| key.with_value(|k| f.value(k).to_string()))
                .unwrap_or_default()
        })
    };
    let visible = move || {
        ctx.form
            .with(|f| f.as_ref().is_some_and(|f| key.with_value(|k| f.is_visible(k))))
    };
    let required = move || {
        ctx.form
            .with(|f| f.as_ref().is_some_and(|f| key.with_value(|k| f.is_required(k))))
    };
    let field_class = move || {
        let missing = ctx.highlighted.with(|h| key.with_value(|k| h.contains(k)));
        match (required(), missing) {
            (_, true) => "field required missing",
            (true, false) => "field required",
            (false, false) => "field",
        }
    };
    let set_value = move |text: String| {
        ctx.update_form(|form| key.with_value(|k| form.set_value(k, text)));
        schedule_live_preview(ctx, store);
    };

    let placeholder = spec.placeholder.clone().unwrap_or_default();
    let control = match spec.control {
        Control::Date => view! {
            <input
                type="date"
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }.into_any(),
        Control::MultiLine => view! {
            <textarea
                rows="4"
                placeholder=placeholder
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            ></textarea>
        }.into_any(),
        Control::Select(options) => view! {
            <select on:change=move |ev| set_value(event_target_value(&ev))>
                {options.into_iter().map(|SelectOption { value: option_value, label }| {
                    let current = option_value.clone();
                    view! {
                        <option
                            value=option_value
                            prop:selected=move || value() == current
                        >
                            {label}
                        </option>
                    }
                }).collect_view()}
            </select>
        }.into_any(),
        Control::Text => view! {
            <input
                type="text"
                placeholder=placeholder
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }.into_any(),
        Control::Parts => view! { <PartsEditor field_key=key /> }.into_any(),
    };

    view! {
        <div class=field_class data-field=spec.key.clone() hidden=move || !visible()>
            <label class="field-label">
                {spec.label.clone()}
                <Show when=required>
                    <span class="field-required-mark">"*"</span>
                </Show>
            </label>
            {control}
        </div>
    }
}
