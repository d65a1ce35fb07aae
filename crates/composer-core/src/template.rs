//! User Templates
//!
//! Client-only intents: their shape, the field-line editor format and the
//! `{{field}}` renderer used instead of the server.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::generate::RenderedMessage;
use crate::model::{humanize, FieldType, Intent, LOCAL_PREFIX};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTemplate {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl UserTemplate {
    /// Map to the merged intent shape
    pub fn to_intent(&self) -> Intent {
        let mut required = Vec::new();
        let mut optional = Vec::new();
        let mut field_types = BTreeMap::new();
        for field in &self.fields {
            if field.required {
                required.push(field.name.clone());
            } else {
                optional.push(field.name.clone());
            }
            field_types.insert(field.name.clone(), field.field_type.clone());
        }
        Intent {
            name: self.id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            required,
            optional,
            field_types,
            local: true,
            ..Default::default()
        }
    }
}

/// `u:` + slug of the label
pub fn local_id_for(label: &str) -> String {
    format!("{}{}", LOCAL_PREFIX, slugify(label))
}

pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn field_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("valid regex"))
}

/// Parse the template editor's field list.
///
/// One field per line: `name[:type][:required|optional]`, or a trailing `*`
/// to mark required. Lines with an invalid name are skipped.
pub fn parse_field_lines(text: &str) -> Vec<TemplateField> {
    let mut fields: Vec<TemplateField> = Vec::new();
    for raw in text.lines() {
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut required = false;
        if let Some(stripped) = line.strip_suffix('*') {
            required = true;
            line = stripped.trim_end();
        }

        let mut parts = line.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if !field_name_re().is_match(name) {
            log::debug!("skipping template field line {:?}", raw);
            continue;
        }
        let mut field_type = FieldType::String;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "required" | "req" => required = true,
                "optional" | "opt" | "" => {}
                other => field_type = FieldType::parse(other),
            }
        }
        if fields.iter().any(|f| f.name == name) {
            continue;
        }
        fields.push(TemplateField { name: name.to_string(), field_type, required });
    }
    fields
}

/// Inverse of [`parse_field_lines`], used to seed the editor
pub fn field_lines(fields: &[TemplateField]) -> String {
    fields
        .iter()
        .map(|f| {
            let mut line = f.name.clone();
            if f.field_type != FieldType::String {
                line.push(':');
                line.push_str(f.field_type.as_str());
            }
            if f.required {
                line.push_str(":required");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build template fields from a server intent's schema
pub fn fields_from_intent(intent: &Intent) -> Vec<TemplateField> {
    intent
        .field_keys()
        .into_iter()
        .map(|key| TemplateField {
            name: key.to_string(),
            field_type: intent.field_type(key),
            required: intent.required.iter().any(|r| r == key),
        })
        .collect()
}

/// Label for a template seeded from a server intent
pub fn customized_label(intent: &Intent) -> String {
    let base = if intent.label.is_empty() { humanize(&intent.name) } else { intent.label.clone() };
    format!("{} (custom)", base)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match (item.get("partNumber"), item.get("quantity")) {
                (Some(pn), Some(qty)) => format!("{} x {}", value_text(pn), value_text(qty)),
                _ => value_text(item),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

/// Substitute `{{field}}` placeholders; unknown keys render empty.
///
/// The result is HTML: template text and values are both escaped.
pub fn substitute(template: &str, fields: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder_re().captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&escape_html(&template[last..whole.start()]));
        if let Some(value) = fields.get(key.as_str()) {
            out.push_str(&escape_html(&value_text(value)));
        }
        last = whole.end();
    }
    out.push_str(&escape_html(&template[last..]));
    out
}

/// Render a user template entirely client-side
pub fn render_local(template: &UserTemplate, fields: &Map<String, Value>) -> RenderedMessage {
    RenderedMessage {
        subject: substitute(&template.subject, fields),
        body: substitute(&template.body, fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_local_substitutes() {
        let template = UserTemplate {
            id: "u:order".into(),
            label: "Order".into(),
            description: String::new(),
            fields: Vec::new(),
            subject: "Hi {{name}}".into(),
            body: "{{name}} ordered {{qty}}".into(),
        };
        let values = fields(json!({"name": "Sam", "qty": "3"}));

        let first = render_local(&template, &values);
        assert_eq!(first.subject, "Hi Sam");
        assert_eq!(first.body, "Sam ordered 3");
        assert_eq!(render_local(&template, &values), first);
    }

    #[test]
    fn test_unknown_placeholder_and_escaping() {
        let values = fields(json!({"name": "<b>Tom & Jerry</b>"}));
        assert_eq!(substitute("{{ name }}|{{missing}}|", &values), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;||");
    }

    #[test]
    fn test_template_markup_is_escaped() {
        let values = fields(json!({"name": "Sam"}));
        assert_eq!(
            substitute("<img src=x onerror=alert(1)> {{name}} & co", &values),
            "&lt;img src=x onerror=alert(1)&gt; Sam &amp; co"
        );
        assert_eq!(substitute("no placeholders", &values), "no placeholders");
    }

    #[test]
    fn test_parts_value_renders_lines() {
        let values = fields(json!({"parts": [{"partNumber": "A1", "quantity": "2"}]}));
        assert_eq!(substitute("{{parts}}", &values), "A1 x 2");
    }

    #[test]
    fn test_parse_field_lines() {
        let parsed = parse_field_lines("name*\neta:date:required\nnotes:longtext\n9bad\n\nname:date\n  \n");
        assert_eq!(
            parsed,
            vec![
                TemplateField { name: "name".into(), field_type: FieldType::String, required: true },
                TemplateField { name: "eta".into(), field_type: FieldType::Date, required: true },
                TemplateField { name: "notes".into(), field_type: FieldType::LongText, required: false },
            ]
        );
        assert_eq!(field_lines(&parsed), "name:required\neta:date:required\nnotes:longtext");
        assert_eq!(parse_field_lines(&field_lines(&parsed)), parsed);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Order  Delay (v2)!"), "order-delay-v2");
        assert_eq!(local_id_for("Thank You"), "u:thank-you");
        assert_eq!(slugify("!!!"), "");
    }
}
