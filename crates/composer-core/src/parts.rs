//! Parts Sub-Editor
//!
//! Repeatable part-number/quantity rows bound to one hidden serialized
//! value, plus the free-text ingestion path for pasted lists.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRow {
    #[serde(rename = "partNumber", default)]
    pub part_number: String,
    #[serde(default)]
    pub quantity: String,
}

impl PartRow {
    pub fn new(part_number: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self { part_number: part_number.into(), quantity: quantity.into() }
    }

    pub fn is_complete(&self) -> bool {
        !self.part_number.trim().is_empty() && !self.quantity.trim().is_empty()
    }
}

/// Keep ASCII digits only
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Editable rows; incomplete rows stay here but never reach the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartsEditor {
    rows: Vec<PartRow>,
}

impl Default for PartsEditor {
    fn default() -> Self {
        Self { rows: vec![PartRow::default()] }
    }
}

impl PartsEditor {
    /// Seed from a serialized value; unreadable or empty input gives one blank row
    pub fn from_serialized(raw: &str) -> Self {
        let rows: Vec<PartRow> = if raw.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(raw).unwrap_or_else(|e| {
                log::debug!("discarding unreadable parts value: {}", e);
                Vec::new()
            })
        };
        Self::from_rows(rows)
    }

    pub fn from_rows(rows: Vec<PartRow>) -> Self {
        if rows.is_empty() {
            Self::default()
        } else {
            Self { rows }
        }
    }

    pub fn rows(&self) -> &[PartRow] {
        &self.rows
    }

    pub fn set_part_number(&mut self, index: usize, value: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            row.part_number = value.to_string();
        }
    }

    /// Quantity is sanitized to digits on every change
    pub fn set_quantity(&mut self, index: usize, value: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            row.quantity = digits_only(value);
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(PartRow::default());
    }

    /// Remove a row; removing the last one leaves a single blank row
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        if self.rows.is_empty() {
            self.rows.push(PartRow::default());
        }
    }

    /// Append parsed rows, replacing a lone blank row
    pub fn append(&mut self, parsed: Vec<PartRow>) {
        if parsed.is_empty() {
            return;
        }
        if self.rows.len() == 1 && self.rows[0] == PartRow::default() {
            self.rows.clear();
        }
        self.rows.extend(parsed);
    }

    pub fn complete_rows(&self) -> Vec<PartRow> {
        self.rows
            .iter()
            .filter(|r| r.is_complete())
            .map(|r| PartRow::new(r.part_number.trim(), r.quantity.trim()))
            .collect()
    }

    /// Hidden field value: JSON array of complete rows
    pub fn serialized(&self) -> String {
        serde_json::to_string(&self.complete_rows()).unwrap_or_else(|_| "[]".to_string())
    }
}

fn trailing_qty_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<pn>.*?)(?:\s+[x×]\s*(?P<x>\d+)|\s*\(\s*(?P<paren>\d+)\s*\)|\s+qty\s*[:=]?\s*(?P<qty>\d+))\s*$",
        )
        .expect("valid regex")
    })
}

fn bare_qty_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<pn>.*\S)\s+(?P<n>\d+)$").expect("valid regex"))
}

/// Split free-form text into part rows, one per non-blank line.
///
/// Preference order: delimited (`,` `|` tab), trailing quantity
/// (`x2`, `(2)`, `qty:2`, bare number), else quantity `1`.
pub fn smart_parse_parts(text: &str) -> Vec<PartRow> {
    text.lines().filter_map(parse_part_line).collect()
}

fn parse_part_line(raw: &str) -> Option<PartRow> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if line.contains([',', '|', '\t']) {
        let mut cells = line.split([',', '|', '\t']).map(str::trim);
        let part_number = cells.next().unwrap_or_default();
        if !part_number.is_empty() {
            let qty = cells.next().map(digits_only).unwrap_or_default();
            return Some(PartRow::new(part_number, if qty.is_empty() { "1".to_string() } else { qty }));
        }
    }

    if let Some(caps) = trailing_qty_re().captures(line) {
        let pn = caps.name("pn").map(|m| m.as_str().trim()).unwrap_or_default();
        let qty = caps
            .name("x")
            .or_else(|| caps.name("paren"))
            .or_else(|| caps.name("qty"))
            .map(|m| m.as_str());
        if let Some(qty) = qty.filter(|_| !pn.is_empty()) {
            return Some(PartRow::new(pn, qty));
        }
    }

    if let Some(caps) = bare_qty_re().captures(line) {
        return Some(PartRow::new(caps["pn"].trim(), &caps["n"]));
    }

    Some(PartRow::new(line, "1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_drops_incomplete_rows() {
        let editor = PartsEditor::from_rows(vec![PartRow::new("A1", "2"), PartRow::new("", "5")]);
        assert_eq!(editor.serialized(), r#"[{"partNumber":"A1","quantity":"2"}]"#);
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn test_seeding() {
        assert_eq!(PartsEditor::from_serialized("").rows(), &[PartRow::default()]);
        assert_eq!(PartsEditor::from_serialized("not json").rows(), &[PartRow::default()]);
        let editor = PartsEditor::from_serialized(r#"[{"partNumber":"B2","quantity":"4"}]"#);
        assert_eq!(editor.rows(), &[PartRow::new("B2", "4")]);
    }

    #[test]
    fn test_edits() {
        let mut editor = PartsEditor::default();
        editor.set_part_number(0, "C3");
        editor.set_quantity(0, "1a2 ");
        assert_eq!(editor.rows()[0], PartRow::new("C3", "12"));

        editor.add_row();
        assert_eq!(editor.rows().len(), 2);
        editor.remove_row(0);
        assert_eq!(editor.rows(), &[PartRow::default()]);
        editor.remove_row(0);
        assert_eq!(editor.rows(), &[PartRow::default()]);
        editor.set_quantity(7, "3");
        assert_eq!(editor.serialized(), "[]");
    }

    #[test]
    fn test_smart_parse_mixed_lines() {
        assert_eq!(
            smart_parse_parts("PN-100 x3\nPN-200,5\nPN-300"),
            vec![PartRow::new("PN-100", "3"), PartRow::new("PN-200", "5"), PartRow::new("PN-300", "1")]
        );
    }

    #[test]
    fn test_smart_parse_quantity_forms() {
        let parsed = smart_parse_parts("AB-1 (4)\nAB-2 qty: 6\nAB-3 7\nAB-4 | 2\nAB-5\t9\n\n  \nAB-6,\nAB-7 X 2");
        assert_eq!(
            parsed,
            vec![
                PartRow::new("AB-1", "4"),
                PartRow::new("AB-2", "6"),
                PartRow::new("AB-3", "7"),
                PartRow::new("AB-4", "2"),
                PartRow::new("AB-5", "9"),
                PartRow::new("AB-6", "1"),
                PartRow::new("AB-7", "2"),
            ]
        );
    }

    #[test]
    fn test_append_replaces_blank_row() {
        let mut editor = PartsEditor::default();
        editor.append(smart_parse_parts("Z9 x2"));
        assert_eq!(editor.rows(), &[PartRow::new("Z9", "2")]);
        editor.append(smart_parse_parts("Z10"));
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn test_x_inside_part_number_is_not_quantity() {
        assert_eq!(smart_parse_parts("BOX12"), vec![PartRow::new("BOX12", "1")]);
    }
}
