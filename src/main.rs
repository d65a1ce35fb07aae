//! Intent Composer Frontend Entry Point

mod api;
mod app;
mod components;
mod compose;
mod config;
mod context;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_warning) = config::load();
    let level = config.log_level().to_level().unwrap_or(log::Level::Info);
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::error_1(&format!("[APP] logger init failed: {}", e).into());
    }
    if let Some(warning) = config_warning {
        log::warn!("{}", warning);
    }
    log::info!("starting composer (api base {:?})", config.api_base);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
