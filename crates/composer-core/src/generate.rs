//! Generate Orchestrator
//!
//! One pass of "turn the current form into a subject/body": local templates
//! render in place, server intents go through `/generate`. Failures end up
//! in the view, never in the caller.

use std::cell::Cell;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::IntentCatalog;
use crate::error::ApiError;
use crate::form::FormState;
use crate::model::{null_as_default, IntentSummary, SchemaMap};
use crate::predict::{Debouncer, Ticket};
use crate::prefs::ComposeMode;
use crate::template::{escape_html, render_local};
use crate::validation::list_missing;

pub const PICK_INTENT_MESSAGE: &str = "Pick a suggestion or a card first.";

// ========================
// Wire types
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub intent: String,
    pub fields: Map<String, Value>,
}

/// `/generate` success body; `missing` may accompany a partial render
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub missing: Vec<String>,
}

/// `/template_source/:id` body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateSource {
    #[serde(rename = "intentId", deserialize_with = "null_as_default")]
    pub intent_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
}

/// Subject/body ready for the output panel (HTML-safe)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

impl RenderedMessage {
    /// From plain server text: drop an echoed `Subject:` line, then escape
    pub fn from_server(subject: &str, body: &str) -> Self {
        let (echoed, body) = strip_subject_line(body);
        let subject = if subject.trim().is_empty() { echoed.unwrap_or_default() } else { subject };
        Self { subject: escape_html(subject.trim()), body: escape_html(body) }
    }
}

/// Split off a leading `Subject: ...` line the backend may echo into the body
pub fn strip_subject_line(body: &str) -> (Option<&str>, &str) {
    let trimmed = body.trim_start();
    let (first, rest) = match trimmed.find('\n') {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => (trimmed, ""),
    };
    let first = first.trim_end_matches('\r');
    let is_subject = first.get(..8).map_or(false, |p| p.eq_ignore_ascii_case("subject:"));
    if !is_subject {
        return (None, body);
    }
    (Some(first[8..].trim()), rest.trim_start_matches(['\r', '\n']))
}

// ========================
// Seams
// ========================

/// Backend endpoints
#[async_trait(?Send)]
pub trait ComposeApi {
    async fn schema(&self) -> Result<SchemaMap, ApiError>;

    async fn intents(&self) -> Result<Vec<IntentSummary>, ApiError>;

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Raw `/predict` body; see [`crate::predict::normalize_prediction`]
    async fn predict(&self, request: &crate::predict::PredictRequest) -> Result<Value, ApiError>;

    async fn template_source(&self, intent_id: &str) -> Result<TemplateSource, ApiError>;
}

/// How output reaches the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Instant,
    Typewriter,
}

impl From<ComposeMode> for Reveal {
    fn from(mode: ComposeMode) -> Self {
        if mode.typewriter() {
            Reveal::Typewriter
        } else {
            Reveal::Instant
        }
    }
}

/// UI side effects of a generate pass
pub trait GenerateView {
    fn set_busy(&self, busy: bool);

    fn show_output(&self, message: &RenderedMessage, reveal: Reveal);

    fn highlight_missing(&self, keys: &[String]);

    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    RenderedLocally,
    NoIntent,
    Rendered { missing: Vec<String> },
    Failed { status: Option<u16>, message: String },
}

/// Run one generate pass.
///
/// `form` must belong to `selected` when both are present.
pub async fn generate<A, V>(
    api: &A,
    view: &V,
    catalog: &IntentCatalog,
    selected: Option<&str>,
    form: Option<&FormState>,
    mode: ComposeMode,
) -> GenerateOutcome
where
    A: ComposeApi + ?Sized,
    V: GenerateView + ?Sized,
{
    let Some(intent_id) = selected else {
        view.notify(PICK_INTENT_MESSAGE);
        return GenerateOutcome::NoIntent;
    };
    let fields = form.map(FormState::payload).unwrap_or_default();

    if catalog.is_local(intent_id) {
        return match catalog.template(intent_id) {
            Some(template) => {
                view.show_output(&render_local(template, &fields), mode.into());
                GenerateOutcome::RenderedLocally
            }
            None => {
                view.notify(PICK_INTENT_MESSAGE);
                GenerateOutcome::NoIntent
            }
        };
    }

    let missing = catalog
        .get(intent_id)
        .map(|intent| list_missing(intent, &fields))
        .unwrap_or_default();
    if !missing.is_empty() {
        log::info!("generating {} with missing fields {:?}", intent_id, missing);
        view.highlight_missing(&missing);
    }

    view.set_busy(true);
    let request = GenerateRequest { intent: intent_id.to_string(), fields };
    let outcome = match api.generate(&request).await {
        Ok(response) => {
            view.show_output(&RenderedMessage::from_server(&response.subject, &response.body), mode.into());
            if !response.missing.is_empty() {
                view.highlight_missing(&response.missing);
            }
            GenerateOutcome::Rendered { missing: response.missing }
        }
        Err(err) => {
            log::error!("generate {} failed: {}", intent_id, err);
            let status = match &err {
                ApiError::Status { status, .. } => Some(*status),
                _ => None,
            };
            if let Some(payload) = err.payload() {
                let partial: GenerateResponse = serde_json::from_value(payload.clone()).unwrap_or_default();
                if !partial.subject.is_empty() || !partial.body.is_empty() {
                    view.show_output(&RenderedMessage::from_server(&partial.subject, &partial.body), Reveal::Instant);
                }
                if !partial.missing.is_empty() {
                    view.highlight_missing(&partial.missing);
                }
            }
            GenerateOutcome::Failed {
                status,
                message: err.message().map(str::to_string).unwrap_or_else(|| err.to_string()),
            }
        }
    };
    view.set_busy(false);
    outcome
}

// ========================
// Live preview
// ========================

/// What a settled live-preview ticket should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    /// A newer edit arrived; do nothing
    Stale,
    Run,
    /// A pass is in flight; run once it finishes
    Deferred,
}

/// Debounced regenerate-on-edit. An edit that settles during an in-flight
/// pass is remembered and replayed when that pass ends.
#[derive(Debug, Default)]
pub struct LivePreview {
    debouncer: Debouncer,
    deferred: Cell<bool>,
}

impl LivePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an edit
    pub fn edited(&self) -> Ticket {
        self.debouncer.bump()
    }

    /// The debounce window for `ticket` elapsed
    pub fn settle(&self, ticket: Ticket, busy: bool) -> PreviewAction {
        if !self.debouncer.is_current(ticket) {
            PreviewAction::Stale
        } else if busy {
            self.deferred.set(true);
            PreviewAction::Deferred
        } else {
            PreviewAction::Run
        }
    }

    /// A generate pass ended; true if a deferred preview should run now
    pub fn take_deferred(&self) -> bool {
        self.deferred.replace(false)
    }
}

// ========================
// Typewriter
// ========================

/// Byte offsets at which to cut `text` for each typewriter tick.
///
/// Advances `per_tick` visible characters per step; an HTML entity counts as
/// one character and a tag is skipped whole. The last step is `text.len()`.
#[derive(Debug, Clone)]
pub struct TypewriterReveal<'a> {
    text: &'a str,
    pos: usize,
    per_tick: usize,
}

impl<'a> TypewriterReveal<'a> {
    pub fn new(text: &'a str, per_tick: usize) -> Self {
        Self { text, pos: 0, per_tick: per_tick.max(1) }
    }

    fn advance_one(&mut self) {
        let rest = &self.text[self.pos..];
        let Some(c) = rest.chars().next() else {
            return;
        };
        let atomic_end = match c {
            '&' => rest.find(';').filter(|&i| i <= 10),
            '<' => rest.find('>'),
            _ => None,
        };
        self.pos += match atomic_end {
            Some(i) => i + 1,
            None => c.len_utf8(),
        };
    }
}

impl Iterator for TypewriterReveal<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.pos >= self.text.len() {
            return None;
        }
        for _ in 0..self.per_tick {
            self.advance_one();
        }
        Some(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_nulls() {
        let response: GenerateResponse =
            serde_json::from_value(serde_json::json!({"subject": "Hi", "body": "B", "missing": null})).unwrap();
        assert_eq!(response, GenerateResponse { subject: "Hi".into(), body: "B".into(), missing: Vec::new() });

        let partial: GenerateResponse =
            serde_json::from_value(serde_json::json!({"detail": "x", "subject": null, "body": "Partial"})).unwrap();
        assert_eq!(partial.body, "Partial");
        assert!(partial.subject.is_empty());

        let source: TemplateSource =
            serde_json::from_value(serde_json::json!({"intentId": "refund", "subject": null, "body": null})).unwrap();
        assert_eq!(source.intent_id, "refund");
        assert!(source.body.is_empty());
    }

    #[test]
    fn test_strip_subject_line() {
        assert_eq!(
            strip_subject_line("Subject: Your order\n\nHello"),
            (Some("Your order"), "Hello")
        );
        assert_eq!(strip_subject_line("  subject:Hi\r\nBody"), (Some("Hi"), "Body"));
        assert_eq!(strip_subject_line("Hello\nSubject: x"), (None, "Hello\nSubject: x"));
        assert_eq!(strip_subject_line("Subject"), (None, "Subject"));
    }

    #[test]
    fn test_from_server_adopts_echoed_subject() {
        let msg = RenderedMessage::from_server("", "Subject: Ship <today>\nBody & more");
        assert_eq!(msg.subject, "Ship &lt;today&gt;");
        assert_eq!(msg.body, "Body &amp; more");

        let msg = RenderedMessage::from_server("Real", "Subject: Echo\nBody");
        assert_eq!(msg.subject, "Real");
        assert_eq!(msg.body, "Body");
    }

    #[test]
    fn test_live_preview_defers_while_busy() {
        let preview = LivePreview::new();
        let first = preview.edited();
        assert_eq!(preview.settle(first, false), PreviewAction::Run);

        // edit lands while the first pass is still in flight
        let second = preview.edited();
        assert_eq!(preview.settle(first, true), PreviewAction::Stale);
        assert_eq!(preview.settle(second, true), PreviewAction::Deferred);
        assert!(preview.take_deferred());
        assert!(!preview.take_deferred());
    }

    #[test]
    fn test_live_preview_runs_when_idle() {
        let preview = LivePreview::new();
        let ticket = preview.edited();
        assert_eq!(preview.settle(ticket, false), PreviewAction::Run);
        assert!(!preview.take_deferred());
    }

    #[test]
    fn test_typewriter_steps() {
        let steps: Vec<usize> = TypewriterReveal::new("abcdefg", 3).collect();
        assert_eq!(steps, vec![3, 6, 7]);
        assert_eq!(TypewriterReveal::new("", 3).count(), 0);
    }

    #[test]
    fn test_typewriter_keeps_entities_whole() {
        let text = "a&amp;b<br>cé";
        let cuts: Vec<&str> = TypewriterReveal::new(text, 2).map(|end| &text[..end]).collect();
        assert_eq!(cuts, vec!["a&amp;", "a&amp;b<br>", "a&amp;b<br>cé"]);
    }

    #[test]
    fn test_reveal_from_mode() {
        assert_eq!(Reveal::from(ComposeMode::Type), Reveal::Typewriter);
        assert_eq!(Reveal::from(ComposeMode::Preview), Reveal::Instant);
        assert_eq!(Reveal::from(ComposeMode::Off), Reveal::Instant);
    }
}
