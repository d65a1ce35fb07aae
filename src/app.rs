//! Intent Composer App
//!
//! Boot loading, theme application and the page layout.

use composer_core::{ClientConfig, ComposeApi, IntentCatalog, SchemaMap};
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::HttpApi;
use crate::components::{FieldArea, IntentGrid, OutputPanel, PredictorBar, SettingsPanel, TemplateManager};
use crate::context::AppContext;
use crate::storage;
use crate::store::{AppState, AppStateStoreFields};

/// Fetch the server catalog and overlay local templates.
///
/// A failed `/schema` leaves only the local templates; a failed `/intents`
/// falls back to schema names.
async fn load_catalog(api: &HttpApi) -> IntentCatalog {
    let schema = api.schema().await.unwrap_or_else(|e| {
        log::error!("failed to load /schema: {}", e);
        SchemaMap::new()
    });
    let summaries = api.intents().await.unwrap_or_else(|e| {
        log::warn!("failed to load /intents: {}", e);
        Vec::new()
    });
    let mut catalog = IntentCatalog::from_server(schema, summaries);
    catalog.set_user_templates(storage::templates().list());
    log::info!("loaded {} intents ({} local)", catalog.intents().len(), catalog.templates().len());
    catalog
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let store = Store::new(AppState::new(&storage::preferences()));
    provide_context(store);

    let ctx = AppContext::new(config);
    provide_context(ctx);

    // Load catalog on mount
    spawn_local(async move {
        let catalog = load_catalog(&HttpApi::new(ctx.config())).await;
        store.catalog().set(catalog);
        store.loaded().set(true);
    });

    // Reflect the theme on <html data-theme>
    Effect::new(move |_| {
        let theme = store.theme().get();
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    });

    view! {
        <div class="composer-layout">
            <header class="composer-header">
                <h1>"Composer"</h1>
                <SettingsPanel />
            </header>

            <PredictorBar />
            <IntentGrid />

            <main class="compose-main">
                <FieldArea />
                <OutputPanel />
            </main>

            <TemplateManager />
        </div>
    }
}
