//! Intent Catalog Endpoints

use composer_core::{ApiError, ClientConfig, IntentSummary, SchemaMap};

use super::get_json;

pub async fn fetch_schema(config: &ClientConfig) -> Result<SchemaMap, ApiError> {
    get_json(&config.url("/schema")).await
}

pub async fn fetch_intents(config: &ClientConfig) -> Result<Vec<IntentSummary>, ApiError> {
    get_json(&config.url("/intents")).await
}
