//! Intent Models
//!
//! Data structures matching the `/schema` and `/intents` payloads, plus the
//! merged `Intent` shape the UI works with.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix reserved for user-authored template ids
pub const LOCAL_PREFIX: &str = "u:";

/// Field type as declared by a schema or a user template
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    String,
    Date,
    /// Multi-line text (`longtext`, `text`, `textarea`)
    LongText,
    Enum,
    Parts,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::LongText => "longtext",
            FieldType::Enum => "enum",
            FieldType::Parts => "parts",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => FieldType::Date,
            "longtext" | "text" | "textarea" => FieldType::LongText,
            "enum" | "select" => FieldType::Enum,
            "parts" => FieldType::Parts,
            _ => FieldType::String,
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        FieldType::parse(&s)
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.as_str().to_string()
    }
}

/// One enum option; the server sends either a bare string or `{value, label}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct EnumOption {
    pub value: String,
    pub label: Option<String>,
}

impl EnumOption {
    pub fn plain(value: impl Into<String>) -> Self {
        Self { value: value.into(), label: None }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: Some(label.into()) }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Labeled {
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<RawOption> for EnumOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(value) => EnumOption { value, label: None },
            RawOption::Labeled { value, label } => EnumOption { value, label },
        }
    }
}

/// Treat an explicit `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-intent entry of the `/schema` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub required: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub optional: Vec<String>,
    #[serde(rename = "fieldTypes", deserialize_with = "null_as_default")]
    pub field_types: BTreeMap<String, FieldType>,
    #[serde(deserialize_with = "null_as_default")]
    pub enums: BTreeMap<String, Vec<EnumOption>>,
    #[serde(deserialize_with = "null_as_default")]
    pub hints: BTreeMap<String, String>,
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hidden: bool,
    pub order: Option<i32>,
}

/// `/schema` response: intent name → entry
pub type SchemaMap = BTreeMap<String, SchemaEntry>;

/// Entry of the `/intents` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSummary {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A selectable message type with its field schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub label: String,
    pub description: String,
    pub required: Vec<String>,
    pub optional: Vec<String>,
    #[serde(rename = "fieldTypes")]
    pub field_types: BTreeMap<String, FieldType>,
    pub enums: BTreeMap<String, Vec<EnumOption>>,
    pub hints: BTreeMap<String, String>,
    pub industry: Option<String>,
    pub hidden: bool,
    pub order: Option<i32>,
    #[serde(rename = "_local")]
    pub local: bool,
}

impl Intent {
    /// Declared field keys, required first, duplicates dropped
    pub fn field_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.required.len() + self.optional.len());
        for key in self.required.iter().chain(self.optional.iter()) {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn declares(&self, key: &str) -> bool {
        self.required.iter().chain(self.optional.iter()).any(|k| k == key)
    }

    pub fn field_type(&self, key: &str) -> FieldType {
        self.field_types.get(key).cloned().unwrap_or_default()
    }

    pub fn options(&self, key: &str) -> &[EnumOption] {
        self.enums.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn is_local_id(name: &str) -> bool {
    name.starts_with(LOCAL_PREFIX)
}

/// Turn a field key or enum value into a display label.
///
/// `shipAddress` → "Ship Address", `order_id` → "Order Id", `next-day` → "Next Day"
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_entry_tolerates_nulls() {
        let schema: SchemaMap = serde_json::from_value(json!({
            "refund": {"required": ["orderId"], "optional": null, "hints": null, "enums": null,
                       "fieldTypes": null, "hidden": null, "label": null},
            "apology": {"required": ["name"]}
        }))
        .unwrap();
        assert_eq!(schema.len(), 2);
        let refund = &schema["refund"];
        assert_eq!(refund.required, vec!["orderId"]);
        assert!(refund.optional.is_empty());
        assert!(refund.hints.is_empty());
        assert!(!refund.hidden);
        assert_eq!(refund.label, None);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("shipAddress"), "Ship Address");
        assert_eq!(humanize("order_id"), "Order Id");
        assert_eq!(humanize("next-day"), "Next Day");
        assert_eq!(humanize("fedex"), "Fedex");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_field_type_aliases() {
        assert_eq!(FieldType::parse("textarea"), FieldType::LongText);
        assert_eq!(FieldType::parse("TEXT"), FieldType::LongText);
        assert_eq!(FieldType::parse("select"), FieldType::Enum);
        assert_eq!(FieldType::parse("number"), FieldType::String);
    }

    #[test]
    fn test_schema_entry_accepts_mixed_options() {
        let raw = json!({
            "required": ["carrier"],
            "fieldTypes": {"carrier": "enum", "eta": "date"},
            "enums": {"carrier": ["fedex", {"value": "other", "label": "Other (specify)"}]}
        });
        let entry: SchemaEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.required, vec!["carrier"]);
        assert!(entry.optional.is_empty());
        assert_eq!(entry.field_types["eta"], FieldType::Date);
        assert_eq!(
            entry.enums["carrier"],
            vec![EnumOption::plain("fedex"), EnumOption::labeled("other", "Other (specify)")]
        );
    }

    #[test]
    fn test_field_keys_dedupes_in_order() {
        let intent = Intent {
            required: vec!["a".into(), "b".into()],
            optional: vec!["b".into(), "c".into()],
            ..Default::default()
        };
        assert_eq!(intent.field_keys(), vec!["a", "b", "c"]);
    }
}
