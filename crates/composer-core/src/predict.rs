//! Auto-Detect Predictor
//!
//! Debounced `/predict` calls for the free-text hint, and normalization of
//! the loosely-shaped prediction response.
//!
//! Accepted aliases, highest priority first:
//! - label: `intent`, `label`, `name`
//! - confidence: `confidence`, `score`, `prob`, `probability`
//! - candidates: `top_k`, `topK`, `top`, `candidates`

use std::cell::Cell;
use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::generate::ComposeApi;

const LABEL_KEYS: [&str; 3] = ["intent", "label", "name"];
const CONFIDENCE_KEYS: [&str; 4] = ["confidence", "score", "prob", "probability"];
const CANDIDATE_KEYS: [&str; 4] = ["top_k", "topK", "top", "candidates"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    pub to: String,
    pub subject: String,
    pub body_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    /// Percent, 0–100
    pub confidence: Option<u8>,
}

/// Display model for the predictor bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prediction {
    pub label: Option<String>,
    pub confidence: Option<u8>,
    pub message: Option<String>,
    /// Alternatives, best first, without the main guess
    pub candidates: Vec<Candidate>,
}

impl Prediction {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.candidates.is_empty() && self.message.is_none()
    }
}

fn first_of<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| value.get(*k)).find(|v| !v.is_null())
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Fractions (≤ 1) become percentages; result is clamped to 0–100
fn percent(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    let pct = if raw <= 1.0 { raw * 100.0 } else { raw };
    Some(pct.round().clamp(0.0, 100.0) as u8)
}

fn candidate_of(value: &Value) -> Option<Candidate> {
    match value {
        Value::String(_) => text_of(value).map(|label| Candidate { label, confidence: None }),
        Value::Array(pair) => {
            let label = pair.first().and_then(text_of)?;
            Some(Candidate { label, confidence: pair.get(1).and_then(percent) })
        }
        Value::Object(_) => {
            let label = first_of(value, &LABEL_KEYS).and_then(text_of)?;
            Some(Candidate { label, confidence: first_of(value, &CONFIDENCE_KEYS).and_then(percent) })
        }
        _ => None,
    }
}

/// Fold any accepted response shape into a [`Prediction`]
pub fn normalize_prediction(value: &Value) -> Prediction {
    let mut candidates: Vec<Candidate> = first_of(value, &CANDIDATE_KEYS)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(candidate_of).collect())
        .unwrap_or_default();

    let label = first_of(value, &LABEL_KEYS)
        .and_then(text_of)
        .or_else(|| candidates.first().map(|c| c.label.clone()));
    let confidence = first_of(value, &CONFIDENCE_KEYS).and_then(percent).or_else(|| {
        let label = label.as_deref()?;
        candidates.iter().find(|c| c.label == label).and_then(|c| c.confidence)
    });

    let mut seen: Vec<String> = label.iter().map(|l| l.to_lowercase()).collect();
    candidates.retain(|c| {
        let key = c.label.to_lowercase();
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    // stable: equal confidences keep server order
    candidates.sort_by_key(|c| std::cmp::Reverse(c.confidence.map_or(-1, i16::from)));

    Prediction {
        label,
        confidence,
        message: value.get("message").and_then(text_of),
        candidates,
    }
}

// ========================
// Debounce
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-input-wins gate: each new input invalidates earlier tickets
#[derive(Debug, Default)]
pub struct Debouncer {
    generation: Cell<u64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> Ticket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.get() == ticket.0
    }

    /// Invalidate everything outstanding
    pub fn cancel(&self) {
        self.bump();
    }
}

#[derive(Debug, Default)]
pub struct Predictor {
    debouncer: Debouncer,
}

impl Predictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hint change and return the work for it.
    ///
    /// The ticket is taken immediately; the returned future waits on
    /// `sleep`, then calls `/predict` only if no newer hint arrived. A
    /// response that lands after a newer hint is dropped. Blank hints
    /// resolve to an empty prediction without a call.
    pub fn hint_changed<'a, A, S>(
        &'a self,
        api: &'a A,
        request: PredictRequest,
        sleep: S,
    ) -> impl Future<Output = Option<Prediction>> + 'a
    where
        A: ComposeApi + ?Sized,
        S: Future<Output = ()> + 'a,
    {
        let ticket = self.debouncer.bump();
        async move {
            if request.body_hint.trim().is_empty() {
                return Some(Prediction::default());
            }
            sleep.await;
            if !self.debouncer.is_current(ticket) {
                return None;
            }
            let result = api.predict(&request).await;
            if !self.debouncer.is_current(ticket) {
                log::debug!("dropping superseded prediction");
                return None;
            }
            match result {
                Ok(raw) => Some(normalize_prediction(&raw)),
                Err(e) => {
                    log::warn!("predict failed: {}", e);
                    None
                }
            }
        }
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
