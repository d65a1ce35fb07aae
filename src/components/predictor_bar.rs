//! Predictor Bar Component
//!
//! Free-text hint with debounced auto-detect; suggestions select an intent
//! but never submit.

use std::rc::Rc;

use composer_core::{PredictRequest, Prediction, Predictor};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpApi;
use crate::context::AppContext;
use crate::store::{store_select_intent, use_app_store, AppStateStoreFields, AppStore};

fn percent_label(confidence: Option<u8>) -> String {
    confidence.map(|c| format!(" {}%", c)).unwrap_or_default()
}

/// Map a predicted label onto a catalog intent (by id, then label)
fn resolve(store: AppStore, label: &str) -> Option<(String, String)> {
    store
        .catalog()
        .read_untracked()
        .resolve(label)
        .map(|intent| (intent.name.clone(), intent.label.clone()))
}

#[component]
pub fn PredictorBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let predictor = StoredValue::new_local(Rc::new(Predictor::new()));

    let (to, set_to) = signal(String::new());
    let (subject, set_subject) = signal(String::new());
    let (hint, set_hint) = signal(String::new());

    let on_hint = move |text: String| {
        set_hint.set(text.clone());
        let request = PredictRequest { to: to.get_untracked(), subject: subject.get_untracked(), body_hint: text };
        let predictor = predictor.get_value();
        let config = ctx.config();
        spawn_local(async move {
            let api = HttpApi::new(config.clone());
            let sleep = TimeoutFuture::new(config.predict_debounce_ms);
            if let Some(prediction) = predictor.hint_changed(&api, request, sleep).await {
                store.prediction().set(prediction);
            }
        });
    };

    let choose = move |label: String| {
        match resolve(store, &label) {
            Some((name, _)) => store_select_intent(&store, Some(name)),
            None => log::warn!("prediction {:?} matches no intent", label),
        }
    };

    let best = move || {
        let prediction: Prediction = store.prediction().get();
        let label = prediction.label?;
        let shown = resolve(store, &label).map_or_else(|| label.clone(), |(_, shown)| shown);
        Some((label, shown, prediction.confidence))
    };

    view! {
        <section class="predictor-bar">
            <div class="predictor-inputs">
                <input
                    type="text"
                    class="predictor-to"
                    placeholder="To"
                    prop:value=move || to.get()
                    on:input=move |ev| set_to.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    class="predictor-subject"
                    placeholder="Subject"
                    prop:value=move || subject.get()
                    on:input=move |ev| set_subject.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    class="predictor-hint"
                    placeholder="Describe the message you need…"
                    prop:value=move || hint.get()
                    on:input=move |ev| on_hint(event_target_value(&ev))
                />
            </div>
            <div class="predictor-result">
                {move || best().map(|(label, shown, confidence)| view! {
                    <button type="button" class="predictor-best" on:click=move |_| choose(label.clone())>
                        {shown}
                        <span class="predictor-confidence">{percent_label(confidence)}</span>
                    </button>
                })}
                {move || store.prediction().get().message.map(|message| view! {
                    <span class="predictor-message">{message}</span>
                })}
                <For
                    each=move || store.prediction().get().candidates
                    key=|candidate| candidate.label.clone()
                    children=move |candidate| {
                        let label = candidate.label.clone();
                        let shown = resolve(store, &candidate.label)
                            .map_or_else(|| candidate.label.clone(), |(_, shown)| shown);
                        view! {
                            <button type="button" class="predictor-chip" on:click=move |_| choose(label.clone())>
                                {shown}
                                <span class="predictor-confidence">{percent_label(candidate.confidence)}</span>
                            </button>
                        }
                    }
                />
            </div>
        </section>
    }
}
