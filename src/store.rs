//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use std::collections::BTreeSet;

use composer_core::{ComposeMode, GlobalDefaults, IntentCatalog, KvStore, Prediction, Preferences, Theme, UserTemplate};
use leptos::prelude::*;
use reactive_stores::Store;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Server intents merged with user templates
    pub catalog: IntentCatalog,
    /// Active intent id (None = nothing picked yet)
    pub selected: Option<String>,
    /// Latest auto-detect result
    pub prediction: Prediction,
    pub compose_mode: ComposeMode,
    pub theme: Theme,
    pub defaults: GlobalDefaults,
    /// Intent grid filter (None = show everything)
    pub visible: Option<BTreeSet<String>>,
    /// Boot fetch finished (successfully or not)
    pub loaded: bool,
}

impl AppState {
    /// Seed from persisted preferences
    pub fn new<S: KvStore>(prefs: &Preferences<S>) -> Self {
        Self {
            compose_mode: prefs.compose_mode(),
            theme: prefs.theme(),
            defaults: prefs.defaults(),
            visible: prefs.visible_intents(),
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Make an intent active; unknown ids and re-selection are ignored
pub fn store_select_intent(store: &AppStore, intent: Option<String>) {
    if store.selected().get_untracked() == intent {
        return;
    }
    let known = intent
        .as_deref()
        .map_or(true, |name| store.catalog().read().get(name).is_some());
    if known {
        store.selected().set(intent);
    } else {
        log::warn!("ignoring selection of unknown intent {:?}", intent);
    }
}

/// Replace the template overlay after a CRUD operation
pub fn store_apply_templates(store: &AppStore, templates: Vec<UserTemplate>) {
    store.catalog().write().set_user_templates(templates);
    store.visible().set(crate::storage::preferences().visible_intents());

    let dangling = store
        .selected()
        .get_untracked()
        .filter(|name| store.catalog().read_untracked().get(name).is_none());
    if dangling.is_some() {
        store.selected().set(None);
    }
}

/// Persist and apply a compose mode
pub fn store_set_compose_mode(store: &AppStore, mode: ComposeMode) {
    if let Err(e) = crate::storage::preferences().set_compose_mode(mode) {
        log::warn!("{}", e);
    }
    store.compose_mode().set(mode);
}

/// Persist and apply a theme
pub fn store_set_theme(store: &AppStore, theme: Theme) {
    if let Err(e) = crate::storage::preferences().set_theme(theme) {
        log::warn!("{}", e);
    }
    store.theme().set(theme);
}
