//! Intent Grid Component
//!
//! Cards for the visible intents; clicking one makes it active.

use composer_core::Intent;
use leptos::prelude::*;

use crate::store::{store_select_intent, use_app_store, AppStateStoreFields};

#[component]
pub fn IntentGrid() -> impl IntoView {
    let store = use_app_store();

    let cards = move || {
        let visible = store.visible().get();
        store
            .catalog()
            .read()
            .visible(visible.as_ref())
            .into_iter()
            .cloned()
            .collect::<Vec<Intent>>()
    };

    view! {
        <section class="intent-grid">
            <Show when=move || !store.loaded().get()>
                <p class="intent-grid-loading">"Loading message types…"</p>
            </Show>
            <For
                each=cards
                key=|intent| (intent.name.clone(), intent.label.clone(), intent.description.clone())
                children=move |intent| {
                    let name = intent.name.clone();
                    let target = intent.name.clone();
                    let is_selected = move || store.selected().get().as_deref() == Some(name.as_str());
                    view! {
                        <button
                            type="button"
                            class=move || if is_selected() { "intent-card selected" } else { "intent-card" }
                            on:click=move |_| store_select_intent(&store, Some(target.clone()))
                        >
                            <span class="intent-label">{intent.label.clone()}</span>
                            {intent.local.then(|| view! { <span class="intent-badge">"mine"</span> })}
                            {intent.industry.clone().map(|industry| view! {
                                <span class="intent-industry">{industry}</span>
                            })}
                            <span class="intent-description">{intent.description.clone()}</span>
                        </button>
                    }
                }
            />
        </section>
    }
}
