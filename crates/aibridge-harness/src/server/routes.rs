use crate::host::{fetch, Delivery};
use crate::state::HarnessState;
use aibridge_bridge::Dispatched;
use aibridge_core::codes;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// Page and health
// ============================================================================

pub async fn health(State(state): State<HarnessState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "variant": state.config.variant,
        "model_path": state.component.model_path().map(|p| p.to_string()),
    }))
}

pub async fn bootstrap_page(State(state): State<HarnessState>) -> Response {
    match state.surface.page() {
        Some(page) => {
            let mime = mime_guess::from_path(page.name()).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                page.html().clone(),
            )
                .into_response()
        }
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no page loaded" })),
        )
            .into_response(),
    }
}

// ============================================================================
// Scheme handler over HTTP
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub url: String,
}

pub async fn resource(
    State(state): State<HarnessState>,
    Query(query): Query<ResourceQuery>,
) -> Response {
    let component = state.component.clone();
    let url = query.url;
    let delivery = tokio::task::spawn_blocking(move || {
        fetch(&url, |request| component.start_resource_request(request))
    })
    .await;

    match delivery {
        Ok(Delivery::Served { response, body }) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, response.mime_type.to_string()),
                (header::CONTENT_LENGTH, response.expected_content_length.to_string()),
            ],
            body,
        )
            .into_response(),
        Ok(Delivery::Failed(message)) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
        }
        Ok(Delivery::Dropped) => (
            StatusCode::GONE,
            Json(json!({ "error": "request was cancelled" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("resource task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// ============================================================================
// Message channel
// ============================================================================

pub async fn message(State(state): State<HarnessState>, Json(body): Json<Value>) -> Response {
    match state.component.try_handle_message(&body) {
        Ok(dispatched) => {
            let body = match dispatched {
                Dispatched::Ready { labels } => json!({ "dispatched": "ready", "labels": labels }),
                Dispatched::Classification => json!({ "dispatched": "reportResult" }),
                Dispatched::Error(code) => json!({ "dispatched": "error", "code": code }),
                Dispatched::Ignored(name) => json!({ "ignored": name }),
            };
            Json(body).into_response()
        }
        Err(e) => {
            tracing::warn!("dropping malformed classifier message: {}", e);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn labels(State(state): State<HarnessState>) -> impl IntoResponse {
    Json(state.component.labels())
}

// ============================================================================
// Model path
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetModelRequest {
    pub path: String,
}

pub async fn get_model(State(state): State<HarnessState>) -> impl IntoResponse {
    Json(json!({ "model_path": state.component.model_path().map(|p| p.to_string()) }))
}

pub async fn set_model(
    State(state): State<HarnessState>,
    Json(req): Json<SetModelRequest>,
) -> Response {
    state.component.set_model_path(&req.path);
    let current = state.component.model_path().map(|p| p.to_string());

    if current.as_deref() == Some(req.path.as_str()) {
        Json(json!({ "model_path": current })).into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": codes::describe(codes::INVALID_MODEL_FILE),
                "code": codes::INVALID_MODEL_FILE,
                "model_path": current,
            })),
        )
            .into_response()
    }
}

pub async fn metrics(State(state): State<HarnessState>) -> impl IntoResponse {
    Json(state.component.metrics().snapshot())
}
