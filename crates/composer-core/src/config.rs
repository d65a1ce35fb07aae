//! Client Configuration
//!
//! Page-provided settings; every field has a default so a partial (or
//! absent) object still yields a usable config.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Prefix for every endpoint; empty means same origin
    pub api_base: String,
    pub log_level: String,
    pub predict_debounce_ms: u32,
    pub live_preview_debounce_ms: u32,
    pub typewriter_chars_per_tick: usize,
    pub typewriter_tick_ms: u32,
    pub highlight_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            log_level: "info".to_string(),
            predict_debounce_ms: 150,
            live_preview_debounce_ms: 400,
            typewriter_chars_per_tick: 3,
            typewriter_tick_ms: 8,
            highlight_ms: 1200,
        }
    }
}

impl ClientConfig {
    /// Join the base with an endpoint path (`/schema`, ...)
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"apiBase": "https://api.example.com/", "predictDebounceMs": 200}"#).unwrap();
        assert_eq!(config.predict_debounce_ms, 200);
        assert_eq!(config.typewriter_chars_per_tick, 3);
        assert_eq!(config.url("/generate"), "https://api.example.com/generate");
    }

    #[test]
    fn test_same_origin_url_and_level() {
        let config = ClientConfig::default();
        assert_eq!(config.url("schema"), "/schema");
        assert_eq!(config.log_level(), log::LevelFilter::Info);

        let noisy = ClientConfig { log_level: "debug".into(), ..Default::default() };
        assert_eq!(noisy.log_level(), log::LevelFilter::Debug);
        let bogus = ClientConfig { log_level: "loud".into(), ..Default::default() };
        assert_eq!(bogus.log_level(), log::LevelFilter::Info);
    }
}
