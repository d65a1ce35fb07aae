//! User Preferences
//!
//! Theme, compose mode, global defaults and the visible-intents set, each a
//! small JSON blob under its own key.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ComposeResult;
use crate::storage::{
    read_json, write_json, KvStore, KEY_COMPOSE_MODE, KEY_DEFAULTS, KEY_THEME, KEY_VISIBLE_INTENTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// How generated output reaches the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeMode {
    /// Live preview: regenerate on field changes, show instantly
    Preview,
    /// Typewriter reveal on explicit generate
    #[default]
    Type,
    /// Instant output, no live preview
    Off,
}

impl ComposeMode {
    pub const ALL: [ComposeMode; 3] = [ComposeMode::Preview, ComposeMode::Type, ComposeMode::Off];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeMode::Preview => "preview",
            ComposeMode::Type => "type",
            ComposeMode::Off => "off",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComposeMode::Preview => "Live preview",
            ComposeMode::Type => "Typewriter",
            ComposeMode::Off => "Instant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn live_preview(&self) -> bool {
        matches!(self, ComposeMode::Preview)
    }

    pub fn typewriter(&self) -> bool {
        matches!(self, ComposeMode::Type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalDefaults {
    #[serde(rename = "shipAddress")]
    pub ship_address: String,
}

/// Preference accessors over a key-value store
#[derive(Debug, Clone)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KvStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Theme {
        read_json(&self.store, KEY_THEME).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> ComposeResult<()> {
        write_json(&self.store, KEY_THEME, &theme)
    }

    pub fn compose_mode(&self) -> ComposeMode {
        read_json(&self.store, KEY_COMPOSE_MODE).unwrap_or_default()
    }

    pub fn set_compose_mode(&self, mode: ComposeMode) -> ComposeResult<()> {
        write_json(&self.store, KEY_COMPOSE_MODE, &mode)
    }

    pub fn defaults(&self) -> GlobalDefaults {
        read_json(&self.store, KEY_DEFAULTS).unwrap_or_default()
    }

    pub fn set_defaults(&self, defaults: &GlobalDefaults) -> ComposeResult<()> {
        write_json(&self.store, KEY_DEFAULTS, defaults)
    }

    /// `None` means every intent is visible
    pub fn visible_intents(&self) -> Option<BTreeSet<String>> {
        read_json(&self.store, KEY_VISIBLE_INTENTS)
    }

    pub fn set_visible_intents(&self, visible: Option<&BTreeSet<String>>) -> ComposeResult<()> {
        match visible {
            Some(set) => write_json(&self.store, KEY_VISIBLE_INTENTS, set),
            None => {
                self.store.remove(KEY_VISIBLE_INTENTS);
                Ok(())
            }
        }
    }

    /// Flip one intent's visibility; the first toggle starts from `all`
    pub fn toggle_visible(&self, name: &str, all: &[String]) -> ComposeResult<BTreeSet<String>> {
        let mut set = self
            .visible_intents()
            .unwrap_or_else(|| all.iter().cloned().collect());
        if !set.remove(name) {
            set.insert(name.to_string());
        }
        write_json(&self.store, KEY_VISIBLE_INTENTS, &set)?;
        Ok(set)
    }

    /// Drop a name from the stored set, if one is stored
    pub fn forget_visible(&self, name: &str) -> ComposeResult<()> {
        if let Some(mut set) = self.visible_intents() {
            if set.remove(name) {
                write_json(&self.store, KEY_VISIBLE_INTENTS, &set)?;
            }
        }
        Ok(())
    }
}
