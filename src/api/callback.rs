use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tokio::sync::{Mutex, Notify};

use crate::types::CallbackParams;

const SUCCESS_PAGE: &str =
    "<h1>Success!</h1><p>Authorization received. You can close this window now.</p>";

/// Slot shared between the callback handler and the waiting receiver.
///
/// Written once by the first request, read once after the server stopped.
#[derive(Clone, Default)]
pub struct CallbackSlot {
    pub params: Arc<Mutex<Option<CallbackParams>>>,
    pub captured: Arc<Notify>,
}

pub async fn callback(
    Query(query): Query<HashMap<String, String>>,
    Extension(slot): Extension<CallbackSlot>,
) -> Response {
    let params = CallbackParams {
        code: query.get("code").cloned(),
        state: query.get("state").cloned(),
        error: query.get("error").cloned(),
    };
    let has_code = params.code.is_some();

    {
        let mut lock = slot.params.lock().await;
        if lock.is_some() {
            // Only the first request counts; anything racing the shutdown is refused.
            return StatusCode::GONE.into_response();
        }
        *lock = Some(params);
    }
    slot.captured.notify_one();

    if has_code {
        (StatusCode::OK, Html(SUCCESS_PAGE)).into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}
