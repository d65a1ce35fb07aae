//! Compose Actions
//!
//! Wires the generate orchestrator and the live-preview debounce to the
//! signals in [`AppContext`].

use composer_core::{generate, GenerateView, PreviewAction, RenderedMessage, Reveal};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpApi;
use crate::context::AppContext;
use crate::store::{AppStore, AppStateStoreFields};

/// Signal-backed view for one generate pass
struct SignalView {
    ctx: AppContext,
}

impl GenerateView for SignalView {
    fn set_busy(&self, busy: bool) {
        self.ctx.busy.set(busy);
    }

    fn show_output(&self, message: &RenderedMessage, reveal: Reveal) {
        self.ctx.notice.set(None);
        match reveal {
            Reveal::Instant => self.ctx.show_instant(message.clone()),
            Reveal::Typewriter => self.ctx.show_typewriter(message.clone()),
        }
    }

    fn highlight_missing(&self, keys: &[String]) {
        self.ctx.flash_missing(keys);
    }

    fn notify(&self, message: &str) {
        self.ctx.notice.set(Some(message.to_string()));
    }
}

/// Generate from the current form. No-op while a request is in flight.
pub fn run_generate(ctx: AppContext, store: AppStore) {
    if ctx.busy.get_untracked() {
        log::debug!("generate ignored: request in flight");
        return;
    }
    let catalog = store.catalog().get_untracked();
    let selected = store.selected().get_untracked();
    let mode = store.compose_mode().get_untracked();
    let form = ctx.form.get_untracked();
    let api = HttpApi::new(ctx.config());

    spawn_local(async move {
        let view = SignalView { ctx };
        let outcome = generate(&api, &view, &catalog, selected.as_deref(), form.as_ref(), mode).await;
        log::debug!("generate finished: {:?}", outcome);
        if ctx.take_deferred_preview() {
            run_generate(ctx, store);
        }
    });
}

/// Called after every field edit; regenerates once input settles in
/// live-preview mode. An edit settling mid-request runs after it.
pub fn schedule_live_preview(ctx: AppContext, store: AppStore) {
    if !store.compose_mode().get_untracked().live_preview() {
        return;
    }
    let (ticket, delay_ms) = ctx.live_preview_ticket();
    spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        match ctx.settle_live_preview(ticket) {
            PreviewAction::Run => run_generate(ctx, store),
            PreviewAction::Deferred => log::debug!("live preview deferred until the current request ends"),
            PreviewAction::Stale => {}
        }
    });
}
