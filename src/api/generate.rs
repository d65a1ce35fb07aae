//! Generate Endpoint

use composer_core::{ApiError, ClientConfig, GenerateRequest, GenerateResponse};

use super::post_json;

pub async fn post_generate(config: &ClientConfig, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
    post_json(&config.url("/generate"), request, None).await
}
