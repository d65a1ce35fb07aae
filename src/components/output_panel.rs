//! Output Panel Component
//!
//! Shows the generated subject/body (already HTML-escaped) or a notice.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn OutputPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let mode_label = move || store.compose_mode().get().label();
    let is_empty = move || ctx.output.with(|o| o.subject.is_empty() && o.body.is_empty());

    view! {
        <section class="output-panel" class:busy=move || ctx.busy.get()>
            <header class="output-header">
                <h2>"Message"</h2>
                <span class="output-mode">{mode_label}</span>
            </header>
            {move || ctx.notice.get().map(|notice| view! {
                <p class="output-notice">{notice}</p>
            })}
            <Show
                when=move || !is_empty()
                fallback=|| view! { <p class="output-placeholder">"Generated text appears here."</p> }
            >
                <div class="output-subject" inner_html=move || ctx.output.with(|o| o.subject.clone())></div>
                <div class="output-body" inner_html=move || ctx.output.with(|o| o.body.clone())></div>
            </Show>
        </section>
    }
}
