//! User Template Store
//!
//! CRUD over the persisted template array.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ComposeError, ComposeResult, TemplateFieldError};
use crate::prefs::Preferences;
use crate::storage::{read_json, write_json, KvStore, KEY_USER_TEMPLATES};
use crate::template::{local_id_for, UserTemplate};

fn local_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^u:[a-z0-9][a-z0-9-]*$").expect("valid regex"))
}

#[derive(Debug, Clone)]
pub struct TemplateStore<S> {
    store: S,
}

impl<S: KvStore> TemplateStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All templates, newest first; unreadable data is treated as empty
    pub fn list(&self) -> Vec<UserTemplate> {
        read_json(&self.store, KEY_USER_TEMPLATES).unwrap_or_default()
    }

    /// Create or edit: replace by id, else prepend
    pub fn upsert(&self, template: UserTemplate) -> ComposeResult<Vec<UserTemplate>> {
        validate(&template)?;
        let mut list = self.list();
        match list.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => list.insert(0, template),
        }
        write_json(&self.store, KEY_USER_TEMPLATES, &list)?;
        Ok(list)
    }

    /// Remove a template and its entry in the visible-intents set
    pub fn delete(&self, id: &str) -> ComposeResult<Vec<UserTemplate>> {
        let mut list = self.list();
        let before = list.len();
        list.retain(|t| t.id != id);
        if list.len() != before {
            write_json(&self.store, KEY_USER_TEMPLATES, &list)?;
        }
        Preferences::new(&self.store).forget_visible(id)?;
        Ok(list)
    }

    /// Copy a template under a fresh id (`-copy`, `-copy-2`, ...)
    pub fn duplicate(&self, id: &str) -> ComposeResult<Vec<UserTemplate>> {
        let list = self.list();
        let source = list
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ComposeError::TemplateNotFound(id.to_string()))?;

        let mut copy = source.clone();
        copy.label = format!("{} (copy)", source.label);
        copy.id = unique_id(&list, &format!("{}-copy", source.id));
        self.upsert(copy)
    }

    /// Id for a new template with this label, unique within the store
    pub fn new_id(&self, label: &str) -> String {
        unique_id(&self.list(), &local_id_for(label))
    }
}

fn unique_id(list: &[UserTemplate], base: &str) -> String {
    if !list.iter().any(|t| t.id == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !list.iter().any(|t| &t.id == candidate))
        .unwrap_or_else(|| base.to_string())
}

pub fn validate(template: &UserTemplate) -> ComposeResult<()> {
    if !local_id_re().is_match(&template.id) {
        return Err(ComposeError::InvalidTemplate {
            field: TemplateFieldError::Id,
            reason: format!("id must look like u:my-template, got {:?}", template.id),
        });
    }
    if template.label.trim().is_empty() {
        return Err(ComposeError::InvalidTemplate {
            field: TemplateFieldError::Label,
            reason: "label is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, KEY_VISIBLE_INTENTS};
    use std::collections::BTreeSet;

    fn template(id: &str, label: &str) -> UserTemplate {
        UserTemplate {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            fields: Vec::new(),
            subject: "s".into(),
            body: "b".into(),
        }
    }

    #[test]
    fn test_upsert_prepends_then_replaces() {
        let store = MemoryStore::new();
        let templates = TemplateStore::new(&store);

        templates.upsert(template("u:a", "A")).unwrap();
        templates.upsert(template("u:b", "B")).unwrap();
        let ids: Vec<String> = templates.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["u:b", "u:a"]);

        let list = templates.upsert(template("u:a", "A2")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].label, "A2");
    }

    #[test]
    fn test_upsert_rejects_bad_id_and_label() {
        let store = MemoryStore::new();
        let templates = TemplateStore::new(&store);

        let err = templates.upsert(template("order", "Order")).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidTemplate { field: TemplateFieldError::Id, .. }));

        let err = templates.upsert(template("u:order", "  ")).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidTemplate { field: TemplateFieldError::Label, .. }));
        assert!(templates.list().is_empty());
    }

    #[test]
    fn test_delete_forgets_visibility() {
        let store = MemoryStore::new();
        let templates = TemplateStore::new(&store);
        templates.upsert(template("u:a", "A")).unwrap();
        let visible: BTreeSet<String> = ["u:a".to_string(), "order".to_string()].into_iter().collect();
        write_json(&store, KEY_VISIBLE_INTENTS, &visible).unwrap();

        let list = templates.delete("u:a").unwrap();
        assert!(list.is_empty());
        let visible: BTreeSet<String> = read_json(&store, KEY_VISIBLE_INTENTS).unwrap();
        assert_eq!(visible.into_iter().collect::<Vec<_>>(), vec!["order"]);
    }

    #[test]
    fn test_duplicate_and_new_id() {
        let store = MemoryStore::new();
        let templates = TemplateStore::new(&store);
        templates.upsert(template("u:thanks", "Thanks")).unwrap();

        let list = templates.duplicate("u:thanks").unwrap();
        assert_eq!(list[0].id, "u:thanks-copy");
        assert_eq!(list[0].label, "Thanks (copy)");
        let list = templates.duplicate("u:thanks").unwrap();
        assert_eq!(list[0].id, "u:thanks-copy-2");

        assert_eq!(templates.new_id("Thanks"), "u:thanks-2");
        assert_eq!(templates.new_id("Welcome!"), "u:welcome");
        assert!(matches!(templates.duplicate("u:nope"), Err(ComposeError::TemplateNotFound(_))));
    }

    #[test]
    fn test_corrupt_storage_lists_empty() {
        let store = MemoryStore::new();
        store.set(KEY_USER_TEMPLATES, "[{\"id\":").unwrap();
        assert!(TemplateStore::new(&store).list().is_empty());
    }
}
