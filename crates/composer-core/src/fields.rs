//! Field Planning
//!
//! Turns an intent (server schema or user template) into the ordered list of
//! controls the field area renders, then wires "Other" companions to their
//! base selects in a second pass.

use crate::catalog::IntentCatalog;
use crate::model::{humanize, EnumOption, FieldType, Intent};

/// Field that pre-fills from the global defaults
pub const SHIP_ADDRESS_KEY: &str = "shipAddress";

/// Field rendered with the parts sub-editor
pub const PARTS_KEY: &str = "parts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl From<&EnumOption> for SelectOption {
    fn from(option: &EnumOption) -> Self {
        let label = option
            .label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| humanize(&option.value));
        Self { value: option.value.clone(), label }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Date,
    MultiLine,
    Select(Vec<SelectOption>),
    Text,
    Parts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub control: Control,
    /// Declared required; wired companions are only required while shown
    pub required: bool,
    pub placeholder: Option<String>,
}

/// A `<base>Other` companion bound to its base select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDependency {
    pub base: String,
    pub companion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPlan {
    pub intent: String,
    pub fields: Vec<FieldSpec>,
    pub dependencies: Vec<OtherDependency>,
}

impl FieldPlan {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn dependency_for(&self, companion: &str) -> Option<&OtherDependency> {
        self.dependencies.iter().find(|d| d.companion == companion)
    }

    pub fn companions_of<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a OtherDependency> + 'a {
        self.dependencies.iter().filter(move |d| d.base == base)
    }

    /// Options of a select field, empty for other controls
    pub fn options(&self, key: &str) -> &[SelectOption] {
        match self.field(key).map(|f| &f.control) {
            Some(Control::Select(options)) => options,
            _ => &[],
        }
    }

    pub fn has_parts(&self) -> bool {
        self.fields.iter().any(|f| f.control == Control::Parts)
    }
}

/// Base key of an "Other" companion: `carrierOther` / `carrier_other` → `carrier`
pub fn other_base(key: &str) -> Option<&str> {
    key.strip_suffix("Other")
        .or_else(|| key.strip_suffix("_other"))
        .filter(|base| !base.is_empty())
}

/// Whether a value or label means "other".
///
/// Case-insensitive, parenthetical notes stripped: `Other (please specify)`.
pub fn is_other(text: &str) -> bool {
    let mut stripped = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }
    stripped.trim().eq_ignore_ascii_case("other")
}

/// Choose the control for one field
pub fn control_for(key: &str, field_type: &FieldType, options: &[EnumOption]) -> Control {
    match field_type {
        FieldType::Date => Control::Date,
        FieldType::LongText => Control::MultiLine,
        _ if !options.is_empty() => Control::Select(options.iter().map(SelectOption::from).collect()),
        FieldType::Parts => Control::Parts,
        _ if key == PARTS_KEY => Control::Parts,
        _ => Control::Text,
    }
}

/// Whether `key` is declared and rendered as a select for this intent
pub fn renders_as_select(intent: &Intent, key: &str) -> bool {
    intent.declares(key)
        && matches!(control_for(key, &intent.field_type(key), intent.options(key)), Control::Select(_))
}

/// Plan the field area for an intent id; `None` clears it.
///
/// Unknown non-local intents also yield `None`.
pub fn plan_fields(catalog: &IntentCatalog, intent_id: Option<&str>) -> Option<FieldPlan> {
    let id = intent_id?;
    if catalog.is_local(id) {
        let template = catalog.template(id)?;
        return Some(plan_for_intent(&template.to_intent()));
    }
    match catalog.get(id) {
        Some(intent) => Some(plan_for_intent(intent)),
        None => {
            log::debug!("no schema for intent {}", id);
            None
        }
    }
}

pub fn plan_for_intent(intent: &Intent) -> FieldPlan {
    // phase 1: every control, in declared order
    let fields: Vec<FieldSpec> = intent
        .field_keys()
        .into_iter()
        .map(|key| FieldSpec {
            key: key.to_string(),
            label: humanize(key),
            control: control_for(key, &intent.field_type(key), intent.options(key)),
            required: intent.required.iter().any(|r| r == key),
            placeholder: intent.hints.get(key).cloned(),
        })
        .collect();

    // phase 2: cross-field wiring, independent of render order
    let dependencies = wire_dependencies(&fields);

    FieldPlan { intent: intent.name.clone(), fields, dependencies }
}

pub fn wire_dependencies(fields: &[FieldSpec]) -> Vec<OtherDependency> {
    fields
        .iter()
        .filter_map(|field| {
            let base = other_base(&field.key)?;
            let base_field = fields.iter().find(|f| f.key == base)?;
            matches!(base_field.control, Control::Select(_)).then(|| OtherDependency {
                base: base.to_string(),
                companion: field.key.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntentSummary, SchemaEntry, SchemaMap};
    use std::collections::BTreeMap;

    fn shipping_intent() -> Intent {
        let mut field_types = BTreeMap::new();
        field_types.insert("eta".to_string(), FieldType::Date);
        field_types.insert("notes".to_string(), FieldType::LongText);
        let mut enums = BTreeMap::new();
        enums.insert(
            "carrier".to_string(),
            vec![
                EnumOption::plain("fedex"),
                EnumOption::labeled("ups", "UPS"),
                EnumOption::labeled("x", "Other (please specify)"),
            ],
        );
        Intent {
            name: "shipping_update".into(),
            label: "Shipping Update".into(),
            // companion listed before its base
            required: vec!["carrierOther".into(), "carrier".into(), "eta".into()],
            optional: vec!["notes".into(), "trackingNumber".into()],
            field_types,
            enums,
            ..Default::default()
        }
    }

    #[test]
    fn test_one_control_per_key_in_order() {
        let plan = plan_for_intent(&shipping_intent());
        let keys: Vec<&str> = plan.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["carrierOther", "carrier", "eta", "notes", "trackingNumber"]);

        assert_eq!(plan.field("eta").unwrap().control, Control::Date);
        assert_eq!(plan.field("notes").unwrap().control, Control::MultiLine);
        assert_eq!(plan.field("trackingNumber").unwrap().control, Control::Text);
        assert!(plan.field("carrier").unwrap().required);
        assert!(!plan.field("notes").unwrap().required);
    }

    #[test]
    fn test_select_uses_exact_options_and_labels() {
        let plan = plan_for_intent(&shipping_intent());
        let options = plan.options("carrier");
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], SelectOption { value: "fedex".into(), label: "Fedex".into() });
        assert_eq!(options[1].label, "UPS");
        assert_eq!(options[2].value, "x");
    }

    #[test]
    fn test_dependencies_wired_regardless_of_order() {
        let plan = plan_for_intent(&shipping_intent());
        assert_eq!(
            plan.dependencies,
            vec![OtherDependency { base: "carrier".into(), companion: "carrierOther".into() }]
        );
    }

    #[test]
    fn test_companion_without_select_base_is_plain() {
        let intent = Intent {
            name: "n".into(),
            required: vec!["reason".into(), "reason_other".into(), "colorOther".into()],
            ..Default::default()
        };
        let plan = plan_for_intent(&intent);
        assert!(plan.dependencies.is_empty());
        assert_eq!(plan.field("colorOther").unwrap().control, Control::Text);
    }

    #[test]
    fn test_is_other_and_other_base() {
        assert!(is_other("other"));
        assert!(is_other(" Other (please specify) "));
        assert!(is_other("OTHER"));
        assert!(!is_other("others"));
        assert!(!is_other("fedex"));
        assert_eq!(other_base("carrierOther"), Some("carrier"));
        assert_eq!(other_base("carrier_other"), Some("carrier"));
        assert_eq!(other_base("Other"), None);
        assert_eq!(other_base("carrier"), None);
    }

    #[test]
    fn test_parts_control() {
        let intent = Intent {
            name: "rma".into(),
            required: vec!["parts".into(), "kit".into()],
            field_types: [("kit".to_string(), FieldType::Parts)].into_iter().collect(),
            ..Default::default()
        };
        let plan = plan_for_intent(&intent);
        assert_eq!(plan.field("parts").unwrap().control, Control::Parts);
        assert_eq!(plan.field("kit").unwrap().control, Control::Parts);
        assert!(plan.has_parts());
    }

    #[test]
    fn test_plan_fields_lookup() {
        let mut schema = SchemaMap::new();
        schema.insert("apology".into(), SchemaEntry { required: vec!["name".into()], ..Default::default() });
        let catalog = IntentCatalog::from_server(
            schema,
            vec![IntentSummary { id: "apology".into(), label: None, industry: None, description: None }],
        );

        assert!(plan_fields(&catalog, None).is_none());
        assert!(plan_fields(&catalog, Some("missing")).is_none());
        assert!(plan_fields(&catalog, Some("u:missing")).is_none());
        let plan = plan_fields(&catalog, Some("apology")).unwrap();
        assert_eq!(plan.intent, "apology");
        assert_eq!(plan.fields.len(), 1);
    }
}
