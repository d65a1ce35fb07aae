//! Predict Endpoint
//!
//! At most one `/predict` request is in flight; starting one aborts the
//! previous request.

use std::cell::RefCell;

use composer_core::{ApiError, ClientConfig, PredictRequest};
use serde_json::Value;
use web_sys::AbortController;

use super::post_json;

thread_local! {
    static IN_FLIGHT: RefCell<Option<AbortController>> = const { RefCell::new(None) };
}

fn replace_in_flight() -> Option<AbortController> {
    let controller = AbortController::new().ok();
    IN_FLIGHT.with(|slot| {
        if let Some(previous) = slot.replace(controller.clone()) {
            previous.abort();
        }
    });
    controller
}

pub async fn post_predict(config: &ClientConfig, request: &PredictRequest) -> Result<Value, ApiError> {
    let controller = replace_in_flight();
    let signal = controller.as_ref().map(AbortController::signal);
    post_json(&config.url("/predict"), request, signal.as_ref()).await
}
