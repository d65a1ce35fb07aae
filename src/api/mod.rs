//! Backend API Wrappers
//!
//! Frontend bindings to the composer HTTP endpoints, organized by domain.

mod generate;
mod intents;
mod predict;
mod template;

use async_trait::async_trait;
use composer_core::{
    ApiError, ClientConfig, ComposeApi, GenerateRequest, GenerateResponse, IntentSummary, PredictRequest, SchemaMap,
    TemplateSource,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use generate::*;
pub use intents::*;
pub use predict::*;
pub use template::*;

// ========================
// Transport
// ========================

fn transport_error(e: gloo_net::Error) -> ApiError {
    let text = e.to_string();
    if text.contains("AbortError") {
        ApiError::Aborted
    } else {
        ApiError::Network(text)
    }
}

/// Non-2xx keeps the parsed body so callers can use `missing`/partials
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;
    if !response.ok() {
        let payload = serde_json::from_str(&text).unwrap_or(Value::Null);
        return Err(ApiError::Status { status, payload });
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = Request::get(url).send().await.map_err(transport_error)?;
    decode(response).await
}

async fn post_json<B, T>(url: &str, body: &B, signal: Option<&web_sys::AbortSignal>) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let response = Request::post(url)
        .abort_signal(signal)
        .json(body)
        .map_err(transport_error)?
        .send()
        .await
        .map_err(transport_error)?;
    decode(response).await
}

// ========================
// ComposeApi
// ========================

/// Live backend, resolved against the page's api base
#[derive(Debug, Clone)]
pub struct HttpApi {
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl ComposeApi for HttpApi {
    async fn schema(&self) -> Result<SchemaMap, ApiError> {
        fetch_schema(&self.config).await
    }

    async fn intents(&self) -> Result<Vec<IntentSummary>, ApiError> {
        fetch_intents(&self.config).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        post_generate(&self.config, request).await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<Value, ApiError> {
        post_predict(&self.config, request).await
    }

    async fn template_source(&self, intent_id: &str) -> Result<TemplateSource, ApiError> {
        fetch_template_source(&self.config, intent_id).await
    }
}
