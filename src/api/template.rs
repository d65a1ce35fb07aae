//! Template Source Endpoint

use composer_core::{ApiError, ClientConfig, TemplateSource};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::get_json;

pub async fn fetch_template_source(config: &ClientConfig, intent_id: &str) -> Result<TemplateSource, ApiError> {
    let path = format!("/template_source/{}", utf8_percent_encode(intent_id, NON_ALPHANUMERIC));
    get_json(&config.url(&path)).await
}
