//! Action handlers
//!
//! `GET`/`OPTIONS` describe the action, `POST` builds the transaction.

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solbound_issuer::InventoryStatus;
use std::sync::Arc;

/// Action description rendered by wallets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub icon: String,
    pub label: String,
    pub title: String,
    pub description: String,
}

/// `POST` body
#[derive(Debug, Deserialize)]
pub struct MintRequest {
    /// Anything but a string is treated as an invalid account
    #[serde(default)]
    pub account: Option<Value>,
}

/// `POST` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    /// Base64 wire transaction, partially signed
    pub transaction: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub inventory_size: usize,
    pub collection: String,
    pub authority: String,
    pub uptime_secs: i64,
    pub timestamp: String,
}

/// `GET` and `OPTIONS /api/actions/mint`
pub async fn get_action(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ActionMetadata> {
    let icon = resolve_icon(&state.action.icon, state.public_base_url.as_deref(), &headers);

    Json(ActionMetadata {
        icon,
        label: state.action.label.clone(),
        title: state.action.title.clone(),
        description: state.action.description.clone(),
    })
}

/// `POST /api/actions/mint`
pub async fn post_action(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> AppResult<Json<MintResponse>> {
    let Json(request) = body.map_err(|e| AppError::MalformedBody(e.body_text()))?;
    let account = match &request.account {
        Some(Value::String(account)) => account.as_str(),
        _ => "",
    };

    let outcome = state.service.mint(account).await?;

    Ok(Json(MintResponse {
        transaction: outcome.transaction,
    }))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let now = chrono::Utc::now();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        inventory_size: state.service.inventory().len(),
        collection: state.service.config().collection.to_string(),
        authority: state.service.authority().to_string(),
        uptime_secs: (now - state.started_at).num_seconds(),
        timestamp: now.to_rfc3339(),
    })
}

/// `GET /status` - issued versus remaining, read from the registry
pub async fn inventory_status(State(state): State<Arc<AppState>>) -> AppResult<Json<InventoryStatus>> {
    Ok(Json(state.service.status().await?))
}

/// Serve the action icon from the asset directory
pub async fn icon(State(state): State<Arc<AppState>>) -> Response {
    let relative = state.action.icon.trim_start_matches('/');
    let path = state.service.config().asset_dir.join(relative);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = HeaderValue::from_static(content_type_for(relative));
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Icon unreadable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Resolve the icon against the configured origin, or the request's own
pub fn resolve_icon(icon: &str, public_base_url: Option<&str>, headers: &HeaderMap) -> String {
    if icon.starts_with("https://") || icon.starts_with("http://") {
        return icon.to_string();
    }

    let path = if icon.starts_with('/') {
        icon.to_string()
    } else {
        format!("/{}", icon)
    };

    let origin = public_base_url
        .map(|base| base.trim_end_matches('/').to_string())
        .or_else(|| request_origin(headers));

    match origin {
        Some(origin) => format!("{}{}", origin, path),
        None => path,
    }
}

fn request_origin(headers: &HeaderMap) -> Option<String> {
    let host = header_str(headers, "x-forwarded-host").or_else(|| header_str(headers, header::HOST.as_str()))?;
    let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    Some(format!("{}://{}", scheme, host))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
