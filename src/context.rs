//! Application Context
//!
//! Shared compose-session state provided via Leptos Context API.

use std::collections::BTreeSet;

use composer_core::{
    ClientConfig, Debouncer, FormState, LivePreview, PreviewAction, RenderedMessage, Ticket, TypewriterReveal,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Live values for the active intent's fields
    pub form: RwSignal<Option<FormState>>,
    /// What the output panel currently shows (may be mid-reveal)
    pub output: RwSignal<RenderedMessage>,
    /// A `/generate` call is in flight
    pub busy: RwSignal<bool>,
    /// Field keys flashing as missing
    pub highlighted: RwSignal<BTreeSet<String>>,
    /// Message shown above the output instead of a result
    pub notice: RwSignal<Option<String>>,
    config: StoredValue<ClientConfig>,
    reveal: StoredValue<Debouncer, LocalStorage>,
    live_preview: StoredValue<LivePreview, LocalStorage>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            form: RwSignal::new(None),
            output: RwSignal::new(RenderedMessage::default()),
            busy: RwSignal::new(false),
            highlighted: RwSignal::new(BTreeSet::new()),
            notice: RwSignal::new(None),
            config: StoredValue::new(config),
            reveal: StoredValue::new_local(Debouncer::new()),
            live_preview: StoredValue::new_local(LivePreview::new()),
        }
    }

    pub fn config(&self) -> ClientConfig {
        self.config.get_value()
    }

    /// Apply a field edit to the active form
    pub fn update_form(&self, f: impl FnOnce(&mut FormState)) {
        self.form.update(|form| {
            if let Some(form) = form {
                f(form);
            }
        });
    }

    // ========================
    // Output
    // ========================

    /// Replace the output at once, stopping any running reveal
    pub fn show_instant(&self, message: RenderedMessage) {
        self.reveal.with_value(Debouncer::cancel);
        self.output.set(message);
    }

    /// Subject appears at once; the body is typed out
    pub fn show_typewriter(&self, message: RenderedMessage) {
        let ticket = self.reveal.with_value(Debouncer::bump);
        let (per_tick, tick_ms) = self
            .config
            .with_value(|c| (c.typewriter_chars_per_tick, c.typewriter_tick_ms));
        let output = self.output;
        let reveal = self.reveal;
        output.set(RenderedMessage { subject: message.subject.clone(), body: String::new() });

        spawn_local(async move {
            for end in TypewriterReveal::new(&message.body, per_tick) {
                if !reveal.with_value(|d| d.is_current(ticket)) {
                    return;
                }
                let shown = message.body[..end].to_string();
                output.update(|o| o.body = shown);
                TimeoutFuture::new(tick_ms).await;
            }
        });
    }

    /// Flash the blank ones among `keys`, then clear them again
    pub fn flash_missing(&self, keys: &[String]) {
        let blank = self
            .form
            .with_untracked(|form| form.as_ref().map(|f| f.blank_keys(keys)))
            .unwrap_or_else(|| keys.to_vec());
        if blank.is_empty() {
            return;
        }
        let highlighted = self.highlighted;
        highlighted.update(|set| set.extend(blank.iter().cloned()));

        let ms = self.config.with_value(|c| c.highlight_ms);
        spawn_local(async move {
            TimeoutFuture::new(ms).await;
            highlighted.update(|set| {
                for key in &blank {
                    set.remove(key);
                }
            });
        });
    }

    // ========================
    // Live preview
    // ========================

    /// Take a live-preview ticket; only the newest survives the delay
    pub fn live_preview_ticket(&self) -> (Ticket, u32) {
        let ticket = self.live_preview.with_value(LivePreview::edited);
        (ticket, self.config.with_value(|c| c.live_preview_debounce_ms))
    }

    pub fn settle_live_preview(&self, ticket: Ticket) -> PreviewAction {
        let busy = self.busy.get_untracked();
        self.live_preview.with_value(|p| p.settle(ticket, busy))
    }

    /// Called when a generate pass ends
    pub fn take_deferred_preview(&self) -> bool {
        self.live_preview.with_value(LivePreview::take_deferred)
    }
}
