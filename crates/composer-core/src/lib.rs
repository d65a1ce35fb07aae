//! Composer Core
//!
//! Platform-independent state and decision logic for the intent composer:
//! - model / catalog: intents from the server merged with user templates
//! - fields / form: schema-driven field plans and live form state
//! - parts: repeatable part rows and free-text ingestion
//! - validation: missing required fields
//! - template / templates: local rendering and template persistence
//! - prefs / storage: preference blobs over an injectable key-value store
//! - predict / generate: prediction normalization and the generate flow

pub mod catalog;
pub mod config;
pub mod error;
pub mod fields;
pub mod form;
pub mod generate;
pub mod model;
pub mod parts;
pub mod predict;
pub mod prefs;
pub mod storage;
pub mod template;
pub mod templates;
pub mod validation;

pub use catalog::IntentCatalog;
pub use config::ClientConfig;
pub use error::{ApiError, ComposeError, ComposeResult, TemplateFieldError};
pub use fields::{plan_fields, Control, FieldPlan, FieldSpec, OtherDependency, SelectOption};
pub use form::FormState;
pub use generate::{
    generate, ComposeApi, GenerateOutcome, GenerateRequest, GenerateResponse, GenerateView, LivePreview,
    PreviewAction, RenderedMessage, Reveal, TemplateSource, TypewriterReveal,
};
pub use model::{EnumOption, FieldType, Intent, IntentSummary, SchemaEntry, SchemaMap};
pub use parts::{smart_parse_parts, PartRow, PartsEditor};
pub use predict::{normalize_prediction, Candidate, Debouncer, PredictRequest, Prediction, Predictor, Ticket};
pub use prefs::{ComposeMode, GlobalDefaults, Preferences, Theme};
pub use storage::{KvStore, MemoryStore};
pub use template::{
    customized_label, field_lines, fields_from_intent, parse_field_lines, render_local, TemplateField, UserTemplate,
};
pub use templates::TemplateStore;
pub use validation::{is_blank, list_missing};
