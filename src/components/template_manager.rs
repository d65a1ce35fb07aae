//! Template Manager Component
//!
//! Lists the user's local templates and edits them. A server intent can be
//! copied into a new template through "Customize".

use composer_core::{
    customized_label, field_lines, fields_from_intent, parse_field_lines, ComposeApi, ComposeError, TemplateFieldError,
    TemplateSource, UserTemplate,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpApi;
use crate::context::AppContext;
use crate::storage;
use crate::store::{store_apply_templates, store_select_intent, use_app_store, AppStateStoreFields, AppStore};

use super::DeleteConfirmButton;

// ========================
// Draft
// ========================

/// Editor contents; `id` stays blank for a new template until saved
#[derive(Debug, Clone, Default, PartialEq)]
struct TemplateDraft {
    /// Editing a stored template (id is fixed)
    existing: bool,
    id: String,
    label: String,
    description: String,
    fields_text: String,
    subject: String,
    body: String,
}

impl TemplateDraft {
    fn from_template(template: &UserTemplate) -> Self {
        Self {
            existing: true,
            id: template.id.clone(),
            label: template.label.clone(),
            description: template.description.clone(),
            fields_text: field_lines(&template.fields),
            subject: template.subject.clone(),
            body: template.body.clone(),
        }
    }

    fn into_template(self) -> UserTemplate {
        UserTemplate {
            fields: parse_field_lines(&self.fields_text),
            id: self.id.trim().to_string(),
            label: self.label.trim().to_string(),
            description: self.description.trim().to_string(),
            subject: self.subject,
            body: self.body,
        }
    }
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn report(result: Result<Vec<UserTemplate>, ComposeError>, store: AppStore) {
    match result {
        Ok(list) => store_apply_templates(&store, list),
        Err(e) => {
            log::error!("template update failed: {}", e);
            alert(&e.to_string());
        }
    }
}

// ========================
// Manager
// ========================

#[component]
pub fn TemplateManager() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let draft = RwSignal::new(None::<TemplateDraft>);
    let (customizing, set_customizing) = signal(false);

    let templates = move || store.catalog().read().templates().to_vec();

    let customizable = move || {
        store
            .selected()
            .get()
            .and_then(|name| store.catalog().read().get(&name).filter(|i| !i.local).cloned())
    };

    let customize = move |_| {
        let Some(intent) = customizable() else {
            return;
        };
        set_customizing.set(true);
        let api = HttpApi::new(ctx.config());
        spawn_local(async move {
            let source = api.template_source(&intent.name).await.unwrap_or_else(|e| {
                log::warn!("no template source for {}: {}", intent.name, e);
                TemplateSource::default()
            });
            draft.set(Some(TemplateDraft {
                existing: false,
                id: String::new(),
                label: customized_label(&intent),
                description: intent.description.clone(),
                fields_text: field_lines(&fields_from_intent(&intent)),
                subject: source.subject,
                body: source.body,
            }));
            set_customizing.set(false);
        });
    };

    view! {
        <section class="template-manager">
            <header class="template-manager-header">
                <h2>"My templates"</h2>
                <button
                    type="button"
                    class="template-new-btn"
                    on:click=move |_| draft.set(Some(TemplateDraft::default()))
                >
                    "+ New"
                </button>
                <Show when=move || customizable().is_some()>
                    <button
                        type="button"
                        class="template-customize-btn"
                        disabled=move || customizing.get()
                        on:click=customize
                    >
                        "Customize current"
                    </button>
                </Show>
            </header>

            <ul class="template-list">
                <For
                    each=templates
                    key=|template| (template.id.clone(), template.label.clone(), template.fields.len())
                    children=move |template| {
                        let editing = template.clone();
                        let id = StoredValue::new(template.id.clone());
                        view! {
                            <li class="template-row">
                                <button
                                    type="button"
                                    class="template-open-btn"
                                    on:click=move |_| store_select_intent(&store, Some(id.get_value()))
                                >
                                    {template.label.clone()}
                                </button>
                                <span class="template-id">{template.id.clone()}</span>
                                <button
                                    type="button"
                                    class="template-edit-btn"
                                    on:click=move |_| draft.set(Some(TemplateDraft::from_template(&editing)))
                                >
                                    "Edit"
                                </button>
                                <button
                                    type="button"
                                    class="template-duplicate-btn"
                                    on:click=move |_| report(storage::templates().duplicate(&id.get_value()), store)
                                >
                                    "Duplicate"
                                </button>
                                <DeleteConfirmButton on_confirm=move |_| {
                                    report(storage::templates().delete(&id.get_value()), store)
                                } />
                            </li>
                        }
                    }
                />
            </ul>

            <Show when=move || draft.with(Option::is_some)>
                <TemplateEditor draft=draft />
            </Show>
        </section>
    }
}

// ========================
// Editor
// ========================

#[component]
fn TemplateEditor(draft: RwSignal<Option<TemplateDraft>>) -> impl IntoView {
    let store = use_app_store();
    let (invalid, set_invalid) = signal(None::<TemplateFieldError>);

    let is_new = move || draft.with(|d| d.as_ref().is_some_and(|d| !d.existing));
    let read = move |f: fn(&TemplateDraft) -> String| draft.with(|d| d.as_ref().map(f).unwrap_or_default());
    let edit = move |f: fn(&mut TemplateDraft, String), text: String| {
        draft.update(|d| {
            if let Some(d) = d {
                f(d, text);
            }
        });
    };

    let save = move |_| {
        let Some(current) = draft.get_untracked() else {
            return;
        };
        set_invalid.set(None);
        let templates = storage::templates();
        let mut template = current.into_template();
        if template.id.is_empty() && !template.label.is_empty() {
            template.id = templates.new_id(&template.label);
        }
        match templates.upsert(template) {
            Ok(list) => {
                store_apply_templates(&store, list);
                draft.set(None);
            }
            Err(ComposeError::InvalidTemplate { field, reason }) => {
                log::warn!("template rejected: {}", reason);
                set_invalid.set(Some(field));
                alert(&reason);
            }
            Err(e) => {
                log::error!("template save failed: {}", e);
                alert(&e.to_string());
            }
        }
    };

    let input_class = move |field: TemplateFieldError| {
        if invalid.get() == Some(field) { "template-input invalid" } else { "template-input" }
    };

    view! {
        <div class="template-editor">
            <h3>{move || if is_new() { "New template" } else { "Edit template" }}</h3>
            <label>
                "Label"
                <input
                    type="text"
                    class=move || input_class(TemplateFieldError::Label)
                    prop:value=move || read(|d| d.label.clone())
                    on:input=move |ev| edit(|d, v| d.label = v, event_target_value(&ev))
                />
            </label>
            <label>
                "Id"
                <input
                    type="text"
                    class=move || input_class(TemplateFieldError::Id)
                    placeholder="generated from the label"
                    readonly=move || !is_new()
                    prop:value=move || read(|d| d.id.clone())
                    on:input=move |ev| edit(|d, v| d.id = v, event_target_value(&ev))
                />
            </label>
            <label>
                "Description"
                <input
                    type="text"
                    class="template-input"
                    prop:value=move || read(|d| d.description.clone())
                    on:input=move |ev| edit(|d, v| d.description = v, event_target_value(&ev))
                />
            </label>
            <label>
                "Fields (one per line: name[:type][:required])"
                <textarea
                    rows="5"
                    class="template-input"
                    placeholder="customerName:string:required\ndeliveryDate:date"
                    prop:value=move || read(|d| d.fields_text.clone())
                    on:input=move |ev| edit(|d, v| d.fields_text = v, event_target_value(&ev))
                ></textarea>
            </label>
            <label>
                "Subject"
                <input
                    type="text"
                    class="template-input"
                    prop:value=move || read(|d| d.subject.clone())
                    on:input=move |ev| edit(|d, v| d.subject = v, event_target_value(&ev))
                />
            </label>
            <label>
                "Body (use {{field}} placeholders)"
                <textarea
                    rows="8"
                    class="template-input"
                    prop:value=move || read(|d| d.body.clone())
                    on:input=move |ev| edit(|d, v| d.body = v, event_target_value(&ev))
                ></textarea>
            </label>
            <div class="template-editor-actions">
                <button type="button" class="template-save-btn" on:click=save>"Save"</button>
                <button type="button" class="template-cancel-btn" on:click=move |_| draft.set(None)>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::{FieldType, TemplateField};

    #[test]
    fn test_draft_round_trips_field_lines() {
        let template = UserTemplate {
            id: "u:thanks".into(),
            label: "Thanks".into(),
            description: String::new(),
            fields: vec![
                TemplateField { name: "name".into(), field_type: FieldType::String, required: true },
                TemplateField { name: "when".into(), field_type: FieldType::Date, required: false },
            ],
            subject: "Hi {{name}}".into(),
            body: "See you {{when}}".into(),
        };
        let draft = TemplateDraft::from_template(&template);
        assert_eq!(draft.fields_text, "name:required\nwhen:date");
        assert_eq!(draft.into_template(), template);
    }

    #[test]
    fn test_draft_trims_identity() {
        let draft = TemplateDraft { id: " u:x ".into(), label: " X ".into(), ..Default::default() };
        assert!(!draft.existing);
        let template = draft.into_template();
        assert_eq!(template.id, "u:x");
        assert_eq!(template.label, "X");
        assert!(template.fields.is_empty());
    }
}
