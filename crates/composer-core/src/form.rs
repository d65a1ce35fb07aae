//! Form State
//!
//! Live values for one rendered field plan. Companion visibility is kept in
//! step with the base select on every write.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::fields::{is_other, Control, FieldPlan, FieldSpec, SHIP_ADDRESS_KEY};
use crate::parts::PartsEditor;
use crate::prefs::GlobalDefaults;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    plan: FieldPlan,
    values: BTreeMap<String, String>,
    shown: BTreeSet<String>,
    parts: BTreeMap<String, PartsEditor>,
}

impl FormState {
    /// Build controls for a plan, then reconcile every dependency once
    pub fn new(plan: FieldPlan) -> Self {
        let mut values = BTreeMap::new();
        let mut parts = BTreeMap::new();
        for field in &plan.fields {
            let initial = match &field.control {
                Control::Select(options) => options.first().map(|o| o.value.clone()).unwrap_or_default(),
                Control::Parts => {
                    let editor = PartsEditor::default();
                    let serialized = editor.serialized();
                    parts.insert(field.key.clone(), editor);
                    serialized
                }
                _ => String::new(),
            };
            values.insert(field.key.clone(), initial);
        }

        let mut state = Self { plan, values, shown: BTreeSet::new(), parts };
        let bases: Vec<String> = state.plan.dependencies.iter().map(|d| d.base.clone()).collect();
        for base in bases {
            state.reconcile(&base);
        }
        state
    }

    pub fn plan(&self) -> &FieldPlan {
        &self.plan
    }

    pub fn intent(&self) -> &str {
        &self.plan.intent
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.plan.fields
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Write a value and update dependent companions synchronously
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        let Some(slot) = self.values.get_mut(key) else {
            return;
        };
        *slot = value.into();
        self.reconcile(key);
    }

    fn reconcile(&mut self, base: &str) {
        let show = self.selects_other(base);
        let companions: Vec<String> = self.plan.companions_of(base).map(|d| d.companion.clone()).collect();
        for companion in companions {
            if show {
                self.shown.insert(companion);
            } else {
                self.shown.remove(&companion);
                if let Some(v) = self.values.get_mut(&companion) {
                    v.clear();
                }
            }
        }
    }

    /// Label of the selected option, if the field is a select
    pub fn selected_label(&self, key: &str) -> Option<&str> {
        let current = self.value(key);
        self.plan
            .options(key)
            .iter()
            .find(|o| o.value == current)
            .map(|o| o.label.as_str())
    }

    /// The base's selected value or label normalizes to "other"
    pub fn selects_other(&self, base: &str) -> bool {
        is_other(self.value(base)) || self.selected_label(base).map_or(false, is_other)
    }

    pub fn is_visible(&self, key: &str) -> bool {
        match self.plan.dependency_for(key) {
            Some(_) => self.shown.contains(key),
            None => self.plan.field(key).is_some(),
        }
    }

    /// Declared required, or a companion currently shown
    pub fn is_required(&self, key: &str) -> bool {
        match self.plan.dependency_for(key) {
            Some(_) => self.shown.contains(key),
            None => self.plan.field(key).map_or(false, |f| f.required),
        }
    }

    pub fn is_blank(&self, key: &str) -> bool {
        match self.parts.get(key) {
            Some(editor) => editor.complete_rows().is_empty(),
            None => self.value(key).trim().is_empty(),
        }
    }

    /// Subset of `keys` whose controls are still empty
    pub fn blank_keys(&self, keys: &[String]) -> Vec<String> {
        keys.iter().filter(|k| self.is_blank(k)).cloned().collect()
    }

    // ========================
    // Parts
    // ========================

    pub fn parts(&self, key: &str) -> Option<&PartsEditor> {
        self.parts.get(key)
    }

    /// Mutate a parts editor and refresh its hidden serialized value
    pub fn update_parts(&mut self, key: &str, f: impl FnOnce(&mut PartsEditor)) {
        if let Some(editor) = self.parts.get_mut(key) {
            f(editor);
            let serialized = editor.serialized();
            self.values.insert(key.to_string(), serialized);
        }
    }

    /// Replace a parts editor from a serialized value
    pub fn load_parts(&mut self, key: &str, serialized: &str) {
        if self.parts.contains_key(key) {
            let editor = PartsEditor::from_serialized(serialized);
            self.values.insert(key.to_string(), editor.serialized());
            self.parts.insert(key.to_string(), editor);
        }
    }

    // ========================
    // Defaults & payload
    // ========================

    /// Pre-fill `shipAddress` from the global defaults when empty
    pub fn apply_defaults(&mut self, defaults: &GlobalDefaults) {
        if defaults.ship_address.trim().is_empty() {
            return;
        }
        if self.values.contains_key(SHIP_ADDRESS_KEY) && self.is_blank(SHIP_ADDRESS_KEY) {
            self.set_value(SHIP_ADDRESS_KEY, defaults.ship_address.clone());
        }
    }

    /// `fields` object for `/generate`; parts go out as arrays
    pub fn payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in &self.plan.fields {
            let value = match self.parts.get(&field.key) {
                Some(editor) => serde_json::to_value(editor.complete_rows()).unwrap_or(Value::Array(Vec::new())),
                None => Value::String(self.value(&field.key).to_string()),
            };
            map.insert(field.key.clone(), value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::plan_for_intent;
    use crate::model::{EnumOption, FieldType, Intent};
    use crate::parts::PartRow;

    fn intent() -> Intent {
        Intent {
            name: "shipping_update".into(),
            required: vec!["carrierOther".into(), "carrier".into(), "parts".into()],
            optional: vec!["shipAddress".into()],
            enums: [(
                "carrier".to_string(),
                vec![EnumOption::plain("fedex"), EnumOption::labeled("x", "Other (specify)")],
            )]
            .into_iter()
            .collect(),
            field_types: [("shipAddress".to_string(), FieldType::LongText)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_companion_follows_base() {
        let mut form = FormState::new(plan_for_intent(&intent()));
        assert_eq!(form.value("carrier"), "fedex");
        assert!(!form.is_visible("carrierOther"));
        assert!(!form.is_required("carrierOther"));

        form.set_value("carrier", "x");
        assert!(form.is_visible("carrierOther"));
        assert!(form.is_required("carrierOther"));

        form.set_value("carrierOther", "DHL");
        form.set_value("carrier", "fedex");
        assert!(!form.is_visible("carrierOther"));
        assert_eq!(form.value("carrierOther"), "");
    }

    #[test]
    fn test_initial_other_selection_shows_companion() {
        let mut i = intent();
        i.enums.insert("carrier".into(), vec![EnumOption::plain("other"), EnumOption::plain("ups")]);
        let form = FormState::new(plan_for_intent(&i));
        assert!(form.is_visible("carrierOther"));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut form = FormState::new(plan_for_intent(&intent()));
        form.set_value("nope", "x");
        assert_eq!(form.value("nope"), "");
        assert!(!form.is_visible("nope"));
    }

    #[test]
    fn test_parts_payload_and_blank() {
        let mut form = FormState::new(plan_for_intent(&intent()));
        assert!(form.is_blank("parts"));
        assert_eq!(form.value("parts"), "[]");

        form.update_parts("parts", |p| {
            p.set_part_number(0, "A1");
            p.set_quantity(0, "2");
            p.add_row();
        });
        assert!(!form.is_blank("parts"));
        assert_eq!(form.value("parts"), r#"[{"partNumber":"A1","quantity":"2"}]"#);
        assert_eq!(form.parts("parts").unwrap().rows().len(), 2);

        let payload = form.payload();
        assert_eq!(payload["parts"], serde_json::json!([{"partNumber": "A1", "quantity": "2"}]));
        assert_eq!(payload["carrier"], "fedex");

        form.load_parts("parts", "garbage");
        assert_eq!(form.parts("parts").unwrap().rows(), &[PartRow::default()]);
    }

    #[test]
    fn test_defaults_prefill_only_when_empty() {
        let defaults = GlobalDefaults { ship_address: "1 Main St".into() };
        let mut form = FormState::new(plan_for_intent(&intent()));
        form.apply_defaults(&defaults);
        assert_eq!(form.value("shipAddress"), "1 Main St");

        form.set_value("shipAddress", "2 Side Rd");
        form.apply_defaults(&defaults);
        assert_eq!(form.value("shipAddress"), "2 Side Rd");
    }

    #[test]
    fn test_blank_keys() {
        let mut form = FormState::new(plan_for_intent(&intent()));
        form.set_value("shipAddress", "  ");
        let keys = vec!["shipAddress".to_string(), "carrier".to_string()];
        assert_eq!(form.blank_keys(&keys), vec!["shipAddress"]);
    }
}
