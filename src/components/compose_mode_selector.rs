//! Compose Mode Selector Component
//!
//! Segmented buttons for preview / typewriter / instant output.

use composer_core::ComposeMode;
use leptos::prelude::*;

/// Compose mode buttons
#[component]
pub fn ComposeModeSelector(
    #[prop(into)] current: Signal<ComposeMode>,
    on_change: impl Fn(ComposeMode) + Copy + 'static,
) -> impl IntoView {
    view! {
        <div class="mode-selector">
            {ComposeMode::ALL.into_iter().map(|mode| {
                let is_selected = move || current.get() == mode;
                view! {
                    <button
                        type="button"
                        class=move || if is_selected() { "mode-btn active" } else { "mode-btn" }
                        title=mode.as_str()
                        on:click=move |_| on_change(mode)
                    >
                        {mode.label()}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
