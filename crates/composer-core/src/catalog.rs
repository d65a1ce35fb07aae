//! Intent Catalog
//!
//! Holds the server intents (from `/intents` + `/schema`) and overlays the
//! user's local templates into one merged list.

use std::collections::BTreeSet;

use crate::model::{humanize, is_local_id, Intent, IntentSummary, SchemaMap};
use crate::template::UserTemplate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentCatalog {
    server: Vec<Intent>,
    templates: Vec<UserTemplate>,
    merged: Vec<Intent>,
}

impl IntentCatalog {
    /// Build from the two boot responses.
    ///
    /// `/intents` order wins; schema-only names follow in sorted order.
    pub fn from_server(schema: SchemaMap, summaries: Vec<IntentSummary>) -> Self {
        let mut server = Vec::with_capacity(schema.len().max(summaries.len()));
        let mut seen = BTreeSet::new();

        for summary in &summaries {
            if !seen.insert(summary.id.clone()) {
                continue;
            }
            let entry = schema.get(&summary.id).cloned().unwrap_or_default();
            let label = summary
                .label
                .clone()
                .filter(|l| !l.trim().is_empty())
                .or_else(|| entry.label.clone())
                .unwrap_or_else(|| humanize(&summary.id));
            server.push(Intent {
                name: summary.id.clone(),
                label,
                description: summary
                    .description
                    .clone()
                    .or_else(|| entry.description.clone())
                    .unwrap_or_default(),
                industry: summary.industry.clone(),
                required: entry.required,
                optional: entry.optional,
                field_types: entry.field_types,
                enums: entry.enums,
                hints: entry.hints,
                hidden: entry.hidden,
                order: entry.order,
                local: false,
            });
        }

        for (name, entry) in schema {
            if seen.contains(&name) {
                continue;
            }
            server.push(Intent {
                label: entry.label.clone().unwrap_or_else(|| humanize(&name)),
                description: entry.description.clone().unwrap_or_default(),
                name,
                required: entry.required,
                optional: entry.optional,
                field_types: entry.field_types,
                enums: entry.enums,
                hints: entry.hints,
                industry: None,
                hidden: entry.hidden,
                order: entry.order,
                local: false,
            });
        }

        let mut catalog = Self { server, templates: Vec::new(), merged: Vec::new() };
        catalog.rebuild();
        catalog
    }

    /// Replace the local templates and recompute the merged list
    pub fn set_user_templates(&mut self, templates: Vec<UserTemplate>) {
        self.templates = templates;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut merged: Vec<Intent> = self.templates.iter().map(UserTemplate::to_intent).collect();
        let local_ids: BTreeSet<&str> = self.templates.iter().map(|t| t.id.as_str()).collect();
        merged.extend(
            self.server
                .iter()
                .filter(|i| !local_ids.contains(i.name.as_str()))
                .cloned(),
        );
        self.merged = merged;
    }

    pub fn intents(&self) -> &[Intent] {
        &self.merged
    }

    pub fn templates(&self) -> &[UserTemplate] {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&Intent> {
        self.merged.iter().find(|i| i.name == name)
    }

    pub fn template(&self, id: &str) -> Option<&UserTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn is_local(&self, name: &str) -> bool {
        is_local_id(name)
    }

    /// Find an intent by exact name, then by case-insensitive label
    pub fn resolve(&self, name_or_label: &str) -> Option<&Intent> {
        let needle = name_or_label.trim();
        self.get(needle).or_else(|| {
            let lowered = needle.to_lowercase();
            self.merged.iter().find(|i| i.label.to_lowercase() == lowered)
        })
    }

    /// Intents shown in the grid.
    ///
    /// Hidden intents never show. Explicitly ordered intents come first.
    /// When a visible set is stored, only its members show.
    pub fn visible(&self, filter: Option<&BTreeSet<String>>) -> Vec<&Intent> {
        let mut list: Vec<&Intent> = self
            .merged
            .iter()
            .filter(|i| !i.hidden)
            .filter(|i| filter.map_or(true, |set| set.contains(&i.name)))
            .collect();
        // stable: unordered intents keep merged order
        list.sort_by_key(|i| match i.order {
            Some(o) => (0, o),
            None => (1, 0),
        });
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, SchemaEntry};
    use crate::template::TemplateField;

    fn entry(required: &[&str]) -> SchemaEntry {
        SchemaEntry {
            required: required.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn summary(id: &str, label: &str) -> IntentSummary {
        IntentSummary {
            id: id.to_string(),
            label: Some(label.to_string()),
            industry: None,
            description: None,
        }
    }

    fn sample() -> IntentCatalog {
        let mut schema = SchemaMap::new();
        schema.insert("order_confirmation".into(), entry(&["orderId"]));
        schema.insert("shipping_update".into(), entry(&["carrier"]));
        schema.insert("apology".into(), entry(&[]));
        IntentCatalog::from_server(
            schema,
            vec![summary("shipping_update", "Shipping Update"), summary("order_confirmation", "Order Confirmation")],
        )
    }

    fn template(id: &str, label: &str) -> UserTemplate {
        UserTemplate {
            id: id.to_string(),
            label: label.to_string(),
            description: String::new(),
            fields: vec![TemplateField {
                name: "name".into(),
                field_type: FieldType::String,
                required: true,
            }],
            subject: "Hi {{name}}".into(),
            body: String::new(),
        }
    }

    #[test]
    fn test_server_order_and_labels() {
        let catalog = sample();
        let names: Vec<&str> = catalog.intents().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["shipping_update", "order_confirmation", "apology"]);
        assert_eq!(catalog.get("apology").unwrap().label, "Apology");
        assert_eq!(catalog.get("shipping_update").unwrap().required, vec!["carrier"]);
    }

    #[test]
    fn test_user_templates_merge_first() {
        let mut catalog = sample();
        catalog.set_user_templates(vec![template("u:thanks", "Thanks")]);

        let first = &catalog.intents()[0];
        assert_eq!(first.name, "u:thanks");
        assert!(first.local);
        assert_eq!(first.required, vec!["name"]);
        assert_eq!(catalog.intents().len(), 4);
        assert!(catalog.is_local("u:thanks"));
        assert!(catalog.template("u:thanks").is_some());

        catalog.set_user_templates(Vec::new());
        assert!(catalog.get("u:thanks").is_none());
    }

    #[test]
    fn test_resolve_by_label() {
        let catalog = sample();
        assert_eq!(catalog.resolve("shipping update").unwrap().name, "shipping_update");
        assert_eq!(catalog.resolve("apology").unwrap().name, "apology");
        assert!(catalog.resolve("unknown").is_none());
    }

    #[test]
    fn test_visible_filter_hidden_and_order() {
        let mut schema = SchemaMap::new();
        schema.insert("a".into(), SchemaEntry::default());
        schema.insert("b".into(), SchemaEntry { order: Some(1), ..Default::default() });
        schema.insert("c".into(), SchemaEntry { hidden: true, ..Default::default() });
        schema.insert("d".into(), SchemaEntry::default());
        let catalog = IntentCatalog::from_server(schema, Vec::new());

        let names: Vec<&str> = catalog.visible(None).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "d"]);

        let only: BTreeSet<String> = ["d".to_string(), "c".to_string()].into_iter().collect();
        let names: Vec<&str> = catalog.visible(Some(&only)).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["d"]);
    }
}
