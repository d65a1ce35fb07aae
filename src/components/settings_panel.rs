//! Settings Panel Component
//!
//! Theme, compose mode, global defaults and which intent cards to show.

use composer_core::GlobalDefaults;
use leptos::prelude::*;

use crate::storage;
use crate::store::{store_set_compose_mode, store_set_theme, use_app_store, AppStateStoreFields};

use super::ComposeModeSelector;

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let store = use_app_store();
    let (open, set_open) = signal(false);

    let save_ship_address = move |text: String| {
        let defaults = GlobalDefaults { ship_address: text.trim().to_string() };
        if let Err(e) = storage::preferences().set_defaults(&defaults) {
            log::warn!("{}", e);
        }
        store.defaults().set(defaults);
    };

    let all_names = move || {
        store
            .catalog()
            .read()
            .intents()
            .iter()
            .filter(|i| !i.hidden)
            .map(|i| (i.name.clone(), i.label.clone()))
            .collect::<Vec<_>>()
    };

    let toggle_visible = move |name: String| {
        let all: Vec<String> = all_names().into_iter().map(|(name, _)| name).collect();
        match storage::preferences().toggle_visible(&name, &all) {
            Ok(visible) => store.visible().set(Some(visible)),
            Err(e) => log::warn!("{}", e),
        }
    };

    let show_all = move |_| {
        if let Err(e) = storage::preferences().set_visible_intents(None) {
            log::warn!("{}", e);
        }
        store.visible().set(None);
    };

    view! {
        <div class="settings">
            <button
                type="button"
                class="theme-toggle-btn"
                on:click=move |_| store_set_theme(&store, store.theme().get_untracked().toggled())
            >
                {move || store.theme().get().toggled().as_str()}
            </button>
            <button type="button" class="settings-toggle-btn" on:click=move |_| set_open.update(|o| *o = !*o)>
                "Settings"
            </button>
            <Show when=move || open.get()>
                <div class="settings-panel">
                    <h3>"Output"</h3>
                    <ComposeModeSelector
                        current=Signal::derive(move || store.compose_mode().get())
                        on_change=move |mode| store_set_compose_mode(&store, mode)
                    />

                    <h3>"Defaults"</h3>
                    <label>
                        "Ship-to address"
                        <textarea
                            rows="3"
                            prop:value=move || store.defaults().get().ship_address
                            on:change=move |ev| save_ship_address(event_target_value(&ev))
                        ></textarea>
                    </label>

                    <h3>"Visible message types"</h3>
                    <button type="button" class="settings-show-all-btn" on:click=show_all>"Show all"</button>
                    <ul class="settings-visible-list">
                        <For
                            each=all_names
                            key=|(name, label)| (name.clone(), label.clone())
                            children=move |(name, label)| {
                                let checked_name = name.clone();
                                let is_visible = move || {
                                    store.visible().get().map_or(true, |set| set.contains(&checked_name))
                                };
                                view! {
                                    <li>
                                        <label>
                                            <input
                                                type="checkbox"
                                                prop:checked=is_visible
                                                on:change=move |_| toggle_visible(name.clone())
                                            />
                                            {label}
                                        </label>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </Show>
        </div>
    }
}
