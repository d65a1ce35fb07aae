//! Page Configuration
//!
//! Reads `window.__COMPOSER_CONFIG__` if the host page defines it.

use composer_core::ClientConfig;
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "__COMPOSER_CONFIG__";

/// Config plus a warning to log once logging is up
pub fn load() -> (ClientConfig, Option<String>) {
    let Some(window) = web_sys::window() else {
        return (ClientConfig::default(), None);
    };
    let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return (ClientConfig::default(), None),
    };
    match serde_wasm_bindgen::from_value::<ClientConfig>(raw) {
        Ok(config) => (config, None),
        Err(e) => (
            ClientConfig::default(),
            Some(format!("ignoring malformed {}: {}", CONFIG_GLOBAL, e)),
        ),
    }
}
