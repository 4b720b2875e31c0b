use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::tweet::format_timestamp;
use crate::domain::{BatchResponse, ExtractionResult};
use crate::server::AppState;

const HOME_PAGE: &str = include_str!("home.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tweet-extractor",
        "timestamp": format_timestamp(&Utc::now()),
    }))
}

pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Request must be JSON");
    };
    let Some(url) = body.get("url").and_then(Value::as_str).filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    };

    info!("Extract request for {}", url);

    // Detached on timeout: the extraction still runs until its session is released.
    let extractor = state.extractor.clone();
    let owned = url.to_string();
    let task = tokio::spawn(async move { extractor.extract(&owned).await });

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => {
            let status = if result.is_success() {
                "success"
            } else {
                "error"
            };
            Json(json!({ "status": status, "data": result })).into_response()
        }
        Ok(Err(e)) => {
            error!("Extraction task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(_) => {
            warn!("Extraction of {} exceeded {:?}", url, state.request_timeout);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Extraction timed out")
        }
    }
}

pub async fn extract_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Request must be JSON");
    };
    let urls: Vec<String> = match body.get("urls").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items.iter().map(url_text).collect(),
        _ => return error_response(StatusCode::BAD_REQUEST, "URLs array is required"),
    };

    info!("Batch request for {} URLs", urls.len());

    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        let extractor = state.extractor.clone();
        let task_url = url.clone();
        let result = match tokio::spawn(async move { extractor.extract(&task_url).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!("Extraction task for {} failed: {}", url, e);
                ExtractionResult::pending(&url).failed(e.to_string())
            }
        };
        results.push(result);
    }

    Json(BatchResponse::summarize(results)).into_response()
}

/// Non-string entries are passed through as their JSON text and rejected by
/// the URL validator.
fn url_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}
